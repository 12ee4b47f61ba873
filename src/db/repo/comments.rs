//! Comment operations for the repository.

use crate::domain::{from_millis, now_millis, Comment};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Repository;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.user_id, u.username, c.photo_id, c.comment_text, c.created_at
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

fn comment_from_row(row: &SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        user_id: row.get("user_id"),
        username: row.get("username"),
        photo_id: row.get("photo_id"),
        text: row.get("comment_text"),
        created_at: from_millis(row.get("created_at")),
    }
}

impl Repository {
    /// Insert a comment.
    ///
    /// # Errors
    /// Returns a foreign-key error if the user or photo does not exist.
    pub async fn insert_comment(
        &self,
        user_id: i64,
        photo_id: i64,
        text: &str,
    ) -> Result<Comment, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO comments (user_id, photo_id, comment_text, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(photo_id)
        .bind(text)
        .bind(now_millis())
        .execute(&self.pool)
        .await?;

        self.get_comment(result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Get a comment by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_comment(&self, id: i64) -> Result<Option<Comment>, sqlx::Error> {
        let row = sqlx::query(&format!("{} WHERE c.id = ?", COMMENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(comment_from_row))
    }

    /// List comments newest first, optionally restricted to one photo.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_comments(&self, photo_id: Option<i64>) -> Result<Vec<Comment>, sqlx::Error> {
        let rows = match photo_id {
            Some(photo_id) => {
                sqlx::query(&format!(
                    "{} WHERE c.photo_id = ? ORDER BY c.created_at DESC, c.id DESC",
                    COMMENT_SELECT
                ))
                .bind(photo_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "{} ORDER BY c.created_at DESC, c.id DESC",
                    COMMENT_SELECT
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows.iter().map(comment_from_row).collect())
    }

    /// Replace a comment's text.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_comment_text(&self, id: i64, text: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE comments SET comment_text = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete a comment. Returns whether it existed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_comment(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
