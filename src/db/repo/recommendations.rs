//! Photo recommendation operations for the repository.

use crate::domain::{
    from_millis, now_millis, NewRecommendation, PhotoRecommendation, RecommendationStatus,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use super::Repository;

const RECOMMENDATION_COLUMNS: &str =
    "id, user_id, title, story, image_file, status, created_at, reviewed_at";

fn recommendation_from_row(row: &SqliteRow) -> Result<PhotoRecommendation, sqlx::Error> {
    let status: String = row.get("status");
    Ok(PhotoRecommendation {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        story: row.get("story"),
        image_file: row.get("image_file"),
        status: RecommendationStatus::from_str(&status)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        created_at: from_millis(row.get("created_at")),
        reviewed_at: row.get::<Option<i64>, _>("reviewed_at").map(from_millis),
    })
}

impl Repository {
    /// Insert a pending recommendation.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_recommendation(
        &self,
        user_id: i64,
        recommendation: &NewRecommendation,
    ) -> Result<PhotoRecommendation, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO photo_recommendations (user_id, title, story, image_file, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&recommendation.title)
        .bind(&recommendation.story)
        .bind(recommendation.image_file.as_deref())
        .bind(RecommendationStatus::Pending.as_str())
        .bind(now_millis())
        .execute(&self.pool)
        .await?;

        self.get_recommendation(result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Get a recommendation by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_recommendation(
        &self,
        id: i64,
    ) -> Result<Option<PhotoRecommendation>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM photo_recommendations WHERE id = ?",
            RECOMMENDATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(recommendation_from_row).transpose()
    }

    /// List recommendations newest first, optionally for one user only.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_recommendations(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<PhotoRecommendation>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM photo_recommendations
             WHERE (? IS NULL OR user_id = ?)
             ORDER BY created_at DESC, id DESC",
            RECOMMENDATION_COLUMNS
        ))
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(recommendation_from_row).collect()
    }

    /// Persist content, status and review time of `recommendation`, provided
    /// the stored status is still `expected_status`.
    ///
    /// Returns `false` when another writer changed the status first.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_recommendation(
        &self,
        recommendation: &PhotoRecommendation,
        expected_status: RecommendationStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE photo_recommendations
            SET title = ?, story = ?, image_file = ?, status = ?, reviewed_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(&recommendation.title)
        .bind(&recommendation.story)
        .bind(recommendation.image_file.as_deref())
        .bind(recommendation.status.as_str())
        .bind(recommendation.reviewed_at.map(|t| t.timestamp_millis()))
        .bind(recommendation.id)
        .bind(expected_status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a recommendation. Returns whether it existed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_recommendation(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM photo_recommendations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
