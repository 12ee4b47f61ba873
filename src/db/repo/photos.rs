//! Daily photo operations for the repository.

use crate::domain::{from_millis, now_millis, DailyPhoto, NewPhoto};
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Repository;

const DATE_FORMAT: &str = "%Y-%m-%d";

const PHOTO_COLUMNS: &str =
    "id, title, image, story, date_taken, date_featured, created_at, updated_at, author_id";

fn parse_date(raw: &str) -> Result<NaiveDate, sqlx::Error> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn photo_from_row(row: &SqliteRow) -> Result<DailyPhoto, sqlx::Error> {
    let date_taken: Option<String> = row.get("date_taken");
    let date_featured: String = row.get("date_featured");
    Ok(DailyPhoto {
        id: row.get("id"),
        title: row.get("title"),
        image: row.get("image"),
        story: row.get("story"),
        date_taken: date_taken.as_deref().map(parse_date).transpose()?,
        date_featured: parse_date(&date_featured)?,
        created_at: from_millis(row.get("created_at")),
        updated_at: from_millis(row.get("updated_at")),
        author_id: row.get("author_id"),
    })
}

impl Repository {
    /// Insert a photo authored by `author_id`.
    ///
    /// # Errors
    /// Returns a unique-violation database error if `date_featured` is already taken.
    pub async fn insert_photo(
        &self,
        photo: &NewPhoto,
        author_id: Option<i64>,
    ) -> Result<DailyPhoto, sqlx::Error> {
        let now = now_millis();
        let result = sqlx::query(
            r#"
            INSERT INTO daily_photos (
                title, image, story, date_taken, date_featured, created_at, updated_at, author_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&photo.title)
        .bind(&photo.image)
        .bind(&photo.story)
        .bind(photo.date_taken.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(photo.date_featured.format(DATE_FORMAT).to_string())
        .bind(now)
        .bind(now)
        .bind(author_id)
        .execute(&self.pool)
        .await?;

        self.get_photo(result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Get a photo by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_photo(&self, id: i64) -> Result<Option<DailyPhoto>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM daily_photos WHERE id = ?",
            PHOTO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(photo_from_row).transpose()
    }

    /// List all photos, most recently featured first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_photos(&self) -> Result<Vec<DailyPhoto>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM daily_photos ORDER BY date_featured DESC",
            PHOTO_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(photo_from_row).collect()
    }

    /// The photo with the latest featured date.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn latest_featured_photo(&self) -> Result<Option<DailyPhoto>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM daily_photos ORDER BY date_featured DESC LIMIT 1",
            PHOTO_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(photo_from_row).transpose()
    }

    /// Photo ids ordered by featured date, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn featured_order_ids(&self) -> Result<Vec<i64>, sqlx::Error> {
        let rows = sqlx::query("SELECT id FROM daily_photos ORDER BY date_featured ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|r| r.get("id")).collect())
    }

    /// Persist every editable field of `photo` and bump `updated_at`.
    ///
    /// # Errors
    /// Returns a unique-violation database error if `date_featured` collides.
    pub async fn update_photo(&self, photo: &DailyPhoto) -> Result<DailyPhoto, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE daily_photos
            SET title = ?, image = ?, story = ?, date_taken = ?, date_featured = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&photo.title)
        .bind(&photo.image)
        .bind(&photo.story)
        .bind(photo.date_taken.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(photo.date_featured.format(DATE_FORMAT).to_string())
        .bind(now_millis())
        .bind(photo.id)
        .execute(&self.pool)
        .await?;

        self.get_photo(photo.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Delete a photo and its comments, likes and saves.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_photo(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM daily_photos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{new_photo, temp_repo, user};
    use crate::error::is_unique_violation;

    #[tokio::test]
    async fn test_insert_and_get() {
        let (repo, _temp) = temp_repo().await;
        let author = user(&repo, "ada").await;
        let photo = repo
            .insert_photo(&new_photo("2024-03-01"), Some(author.id))
            .await
            .unwrap();
        assert_eq!(photo.author_id, Some(author.id));
        assert_eq!(repo.get_photo(photo.id).await.unwrap(), Some(photo));
    }

    #[tokio::test]
    async fn test_date_featured_is_unique() {
        let (repo, _temp) = temp_repo().await;
        repo.insert_photo(&new_photo("2024-03-01"), None)
            .await
            .unwrap();
        let err = repo
            .insert_photo(&new_photo("2024-03-01"), None)
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_featured_ordering() {
        let (repo, _temp) = temp_repo().await;
        let mid = repo.insert_photo(&new_photo("2024-03-02"), None).await.unwrap();
        let old = repo.insert_photo(&new_photo("2024-03-01"), None).await.unwrap();
        let new = repo.insert_photo(&new_photo("2024-03-03"), None).await.unwrap();

        assert_eq!(
            repo.featured_order_ids().await.unwrap(),
            vec![old.id, mid.id, new.id]
        );
        let listed: Vec<i64> = repo
            .list_photos()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(listed, vec![new.id, mid.id, old.id]);
        assert_eq!(
            repo.latest_featured_photo().await.unwrap().map(|p| p.id),
            Some(new.id)
        );
    }

    #[tokio::test]
    async fn test_author_deletion_nulls_author() {
        let (repo, _temp) = temp_repo().await;
        let author = user(&repo, "ada").await;
        let photo = repo
            .insert_photo(&new_photo("2024-03-01"), Some(author.id))
            .await
            .unwrap();

        assert!(repo.delete_user(author.id).await.unwrap());
        let photo = repo.get_photo(photo.id).await.unwrap().unwrap();
        assert_eq!(photo.author_id, None);
    }
}
