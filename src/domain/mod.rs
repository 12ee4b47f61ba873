//! Domain types for the Pictale photo service.
//!
//! This module provides:
//! - Entity types: users, daily photos, comments, likes, saved photos, recommendations
//! - Field validation shared by the API handlers
//! - The moderation status transition rule for recommendations
//! - Previous/next navigation over featured photos

pub mod comment;
pub mod engagement;
pub mod navigation;
pub mod photo;
pub mod primitives;
pub mod recommendation;
pub mod user;

pub use comment::Comment;
pub use engagement::{Like, SavedPhoto};
pub use navigation::{neighbours, Neighbours};
pub use photo::{DailyPhoto, NewPhoto, PhotoChanges};
pub use primitives::{
    from_millis, now_millis, require_text, validate_title, ValidationError, MAX_TITLE_LEN,
};
pub use recommendation::{
    NewRecommendation, PhotoRecommendation, RecommendationChanges, RecommendationStatus,
};
pub use user::{validate_email, validate_username, NewUser, ProfileChanges, User};
