//! Account and API token operations for the repository.

use crate::auth::generate_token_key;
use crate::domain::{from_millis, now_millis, NewUser, User};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Repository;

const USER_COLUMNS: &str = "u.id, u.username, u.email, u.first_name, u.last_name, u.bio, \
     u.profile_picture, u.is_staff, u.is_active, u.date_joined, u.last_login";

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        bio: row.get("bio"),
        profile_picture: row.get("profile_picture"),
        is_staff: row.get("is_staff"),
        is_active: row.get("is_active"),
        date_joined: from_millis(row.get("date_joined")),
        last_login: row.get::<Option<i64>, _>("last_login").map(from_millis),
    }
}

impl Repository {
    /// Insert an account.
    ///
    /// # Errors
    /// Returns a unique-violation database error if the username is taken.
    pub async fn create_user(&self, new_user: &NewUser) -> Result<User, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, is_staff, date_joined)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.is_staff)
        .bind(now_millis())
        .execute(&self.pool)
        .await?;

        self.get_user(result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Get an account by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_user(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query(&format!("SELECT {} FROM users u WHERE u.id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    /// Get an account and its stored password hash by username.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {}, u.password_hash FROM users u WHERE u.username = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| {
            let hash: String = r.get("password_hash");
            (user_from_row(&r), hash)
        }))
    }

    /// Persist the editable profile fields of `user`.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_profile(&self, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET email = ?, first_name = ?, last_name = ?, bio = ?, profile_picture = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.bio.as_deref())
        .bind(user.profile_picture.as_deref())
        .bind(user.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Replace a stored password hash.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn set_password_hash(&self, user_id: i64, hash: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Grant or revoke staff rights.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn set_staff(&self, user_id: i64, is_staff: bool) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET is_staff = ? WHERE id = ?")
            .bind(is_staff)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Record a successful login.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn touch_last_login(&self, user_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(now_millis())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete an account and, through foreign keys, everything it owns.
    ///
    /// Returns whether a row was deleted.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_user(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Token operations
    // =========================================================================

    /// Return the user's token, creating one if none exists.
    ///
    /// # Errors
    /// Returns an error if the insert or query fails.
    pub async fn get_or_create_token(&self, user_id: i64) -> Result<String, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO auth_tokens (key, user_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO NOTHING
            "#,
        )
        .bind(generate_token_key())
        .bind(user_id)
        .bind(now_millis())
        .execute(&self.pool)
        .await?;

        let row = sqlx::query("SELECT key FROM auth_tokens WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("key"))
    }

    /// Resolve a token key to its account.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_user_by_token(&self, key: &str) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users u JOIN auth_tokens t ON t.user_id = u.id WHERE t.key = ?",
            USER_COLUMNS
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    /// Delete a token. Returns whether it existed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_token(&self, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
