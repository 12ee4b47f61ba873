//! Timestamps and field validation shared by every entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Maximum length of photo and recommendation titles, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Validation failure on a client-supplied field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}: This field may not be blank.")]
    Blank(&'static str),
    #[error("{field}: Ensure this field has no more than {max} characters.")]
    TooLong { field: &'static str, max: usize },
    #[error("{field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Current time in milliseconds since Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert stored milliseconds back into a UTC timestamp.
///
/// Out-of-range values clamp to the Unix epoch.
pub fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Require a non-blank text field, returning it trimmed.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(trimmed.to_string())
}

/// Require a non-blank title of at most [`MAX_TITLE_LEN`] characters.
pub fn validate_title(value: &str) -> Result<String, ValidationError> {
    let title = require_text("title", value)?;
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title",
            max: MAX_TITLE_LEN,
        });
    }
    Ok(title)
}

/// Deserialize a field that distinguishes "absent" from an explicit `null`.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`: a missing key
/// stays `None`, `null` becomes `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
