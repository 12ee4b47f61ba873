//! Comments left on daily photos.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A comment by one user on one photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub username: String,
    #[serde(rename = "photo")]
    pub photo_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
