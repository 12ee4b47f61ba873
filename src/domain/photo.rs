//! Daily featured photos.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::{nullable, require_text, validate_title, ValidationError};

/// A photo featured on exactly one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPhoto {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub story: String,
    pub date_taken: Option<NaiveDate>,
    pub date_featured: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Option<i64>,
}

/// Client payload for creating (or fully replacing) a photo.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPhoto {
    pub title: String,
    pub image: String,
    pub story: String,
    #[serde(default)]
    pub date_taken: Option<NaiveDate>,
    pub date_featured: NaiveDate,
}

impl NewPhoto {
    /// Trim and check every field.
    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(NewPhoto {
            title: validate_title(&self.title)?,
            image: require_text("image", &self.image)?,
            story: require_text("story", &self.story)?,
            date_taken: self.date_taken,
            date_featured: self.date_featured,
        })
    }
}

/// Partial photo update. Absent fields are left untouched; `date_taken: null`
/// clears the date.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoChanges {
    pub title: Option<String>,
    pub image: Option<String>,
    pub story: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_taken: Option<Option<NaiveDate>>,
    pub date_featured: Option<NaiveDate>,
}

impl From<NewPhoto> for PhotoChanges {
    fn from(photo: NewPhoto) -> Self {
        PhotoChanges {
            title: Some(photo.title),
            image: Some(photo.image),
            story: Some(photo.story),
            date_taken: Some(photo.date_taken),
            date_featured: Some(photo.date_featured),
        }
    }
}

impl DailyPhoto {
    /// Apply `changes`, validating each supplied field.
    pub fn apply(&mut self, changes: PhotoChanges) -> Result<(), ValidationError> {
        if let Some(title) = changes.title {
            self.title = validate_title(&title)?;
        }
        if let Some(image) = changes.image {
            self.image = require_text("image", &image)?;
        }
        if let Some(story) = changes.story {
            self.story = require_text("story", &story)?;
        }
        if let Some(date_taken) = changes.date_taken {
            self.date_taken = date_taken;
        }
        if let Some(date_featured) = changes.date_featured {
            self.date_featured = date_featured;
        }
        Ok(())
    }
}
