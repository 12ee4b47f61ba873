//! Photo recommendations submitted by users and moderated by staff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::primitives::{require_text, validate_title, ValidationError};

/// Moderation state of a recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RecommendationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationStatus::Pending => "pending",
            RecommendationStatus::Approved => "approved",
            RecommendationStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for RecommendationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RecommendationStatus::Pending),
            "approved" => Ok(RecommendationStatus::Approved),
            "rejected" => Ok(RecommendationStatus::Rejected),
            other => Err(ValidationError::Invalid {
                field: "status",
                message: format!("\"{}\" is not a valid choice.", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoRecommendation {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub title: String,
    pub story: String,
    pub image_file: Option<String>,
    pub status: RecommendationStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRecommendation {
    pub title: String,
    pub story: String,
    #[serde(default)]
    pub image_file: Option<String>,
}

impl NewRecommendation {
    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(NewRecommendation {
            title: validate_title(&self.title)?,
            story: require_text("story", &self.story)?,
            image_file: self
                .image_file
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

/// Partial update. `reviewed_at` is derived from status transitions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationChanges {
    pub title: Option<String>,
    pub story: Option<String>,
    pub image_file: Option<String>,
    pub status: Option<RecommendationStatus>,
}

impl PhotoRecommendation {
    /// Move to `new_status`, stamping `reviewed_at` only when the status actually changes.
    ///
    /// Returns whether a transition happened.
    pub fn apply_status(&mut self, new_status: RecommendationStatus, now: DateTime<Utc>) -> bool {
        if self.status == new_status {
            return false;
        }
        self.status = new_status;
        self.reviewed_at = Some(now);
        true
    }

    /// Apply content edits and an optional status change.
    pub fn apply(
        &mut self,
        changes: RecommendationChanges,
        now: DateTime<Utc>,
    ) -> Result<bool, ValidationError> {
        if let Some(title) = changes.title {
            self.title = validate_title(&title)?;
        }
        if let Some(story) = changes.story {
            self.story = require_text("story", &story)?;
        }
        if let Some(image_file) = changes.image_file {
            let trimmed = image_file.trim();
            self.image_file = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        Ok(match changes.status {
            Some(status) => self.apply_status(status, now),
            None => false,
        })
    }
}
