pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    Comment, DailyPhoto, Like, PhotoRecommendation, RecommendationStatus, SavedPhoto, User,
};
pub use error::AppError;
