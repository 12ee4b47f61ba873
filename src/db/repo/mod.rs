//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by domain:
//! - `users.rs` - Accounts and API tokens
//! - `photos.rs` - Daily photos and featured-order queries
//! - `comments.rs` - Comments
//! - `engagement.rs` - Likes and saved photos
//! - `recommendations.rs` - Photo recommendations

mod comments;
mod engagement;
mod photos;
mod recommendations;
mod users;

use sqlx::sqlite::SqlitePool;

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Check the database answers queries.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
