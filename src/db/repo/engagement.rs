//! Like and saved-photo operations for the repository.
//!
//! Both tables carry UNIQUE(user_id, photo_id); inserts use `ON CONFLICT DO NOTHING`
//! and report `None` when the pair already exists.

use crate::domain::{from_millis, now_millis, Like, SavedPhoto};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Repository;

fn like_from_row(row: &SqliteRow) -> Like {
    Like {
        id: row.get("id"),
        user_id: row.get("user_id"),
        photo_id: row.get("photo_id"),
        created_at: from_millis(row.get("created_at")),
    }
}

fn saved_from_row(row: &SqliteRow) -> SavedPhoto {
    SavedPhoto {
        id: row.get("id"),
        user_id: row.get("user_id"),
        photo_id: row.get("photo_id"),
        saved_at: from_millis(row.get("saved_at")),
    }
}

impl Repository {
    // =========================================================================
    // Likes
    // =========================================================================

    /// Like a photo. Returns `None` if the user already liked it.
    ///
    /// # Errors
    /// Returns a foreign-key error if the user or photo does not exist.
    pub async fn insert_like(&self, user_id: i64, photo_id: i64) -> Result<Option<Like>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO likes (user_id, photo_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, photo_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(photo_id)
        .bind(now_millis())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_like(result.last_insert_rowid()).await
    }

    /// Get a like by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_like(&self, id: i64) -> Result<Option<Like>, sqlx::Error> {
        let row = sqlx::query("SELECT id, user_id, photo_id, created_at FROM likes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(like_from_row))
    }

    /// List likes, optionally restricted to one user and/or one photo.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_likes(
        &self,
        user_id: Option<i64>,
        photo_id: Option<i64>,
    ) -> Result<Vec<Like>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, photo_id, created_at
            FROM likes
            WHERE (? IS NULL OR user_id = ?) AND (? IS NULL OR photo_id = ?)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(photo_id)
        .bind(photo_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(like_from_row).collect())
    }

    /// Delete a like. Returns whether it existed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_like(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM likes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Saved photos
    // =========================================================================

    /// Save a photo. Returns `None` if the user already saved it.
    ///
    /// # Errors
    /// Returns a foreign-key error if the user or photo does not exist.
    pub async fn insert_saved_photo(
        &self,
        user_id: i64,
        photo_id: i64,
    ) -> Result<Option<SavedPhoto>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO saved_photos (user_id, photo_id, saved_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, photo_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(photo_id)
        .bind(now_millis())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_saved_photo(result.last_insert_rowid()).await
    }

    /// Get a saved-photo record by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_saved_photo(&self, id: i64) -> Result<Option<SavedPhoto>, sqlx::Error> {
        let row = sqlx::query("SELECT id, user_id, photo_id, saved_at FROM saved_photos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(saved_from_row))
    }

    /// List saved photos, optionally restricted to one user and/or one photo, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_saved_photos(
        &self,
        user_id: Option<i64>,
        photo_id: Option<i64>,
    ) -> Result<Vec<SavedPhoto>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, photo_id, saved_at
            FROM saved_photos
            WHERE (? IS NULL OR user_id = ?) AND (? IS NULL OR photo_id = ?)
            ORDER BY saved_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(photo_id)
        .bind(photo_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(saved_from_row).collect())
    }

    /// Delete a saved-photo record. Returns whether it existed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_saved_photo(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM saved_photos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
