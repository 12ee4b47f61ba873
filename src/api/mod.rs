pub mod accounts;
pub mod comments;
pub mod extract;
pub mod health;
pub mod likes;
pub mod photos;
pub mod recommendations;
pub mod saved;

use crate::config::Config;
use crate::db::Repository;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config) -> Self {
        Self { repo, config }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/auth/register/", post(accounts::register))
        .route("/api/auth/login/", post(accounts::login))
        .route("/api/auth/logout/", post(accounts::logout))
        .route(
            "/api/auth/profile/",
            get(accounts::get_profile)
                .put(accounts::update_profile)
                .patch(accounts::update_profile)
                .delete(accounts::delete_account),
        )
        .route("/api/auth/change-password/", post(accounts::change_password))
        .route(
            "/api/dailyphotos/",
            get(photos::list_photos).post(photos::create_photo),
        )
        .route("/api/dailyphotos/featured/", get(photos::get_featured_photo))
        .route(
            "/api/dailyphotos/:id/",
            get(photos::get_photo)
                .put(photos::replace_photo)
                .patch(photos::patch_photo)
                .delete(photos::delete_photo),
        )
        .route("/api/dailyphotos/:id/detail/", get(photos::get_photo_detail))
        .route(
            "/api/comments/",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/comments/:id/",
            get(comments::get_comment)
                .put(comments::update_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/api/likes/", get(likes::list_likes))
        .route("/api/likes/like_photo/", post(likes::like_photo))
        .route(
            "/api/likes/:id/",
            get(likes::get_like).delete(likes::delete_like),
        )
        .route("/api/savedphotos/", get(saved::list_saved_photos))
        .route("/api/savedphotos/save_photo/", post(saved::save_photo))
        .route(
            "/api/savedphotos/:id/",
            get(saved::get_saved_photo).delete(saved::delete_saved_photo),
        )
        .route(
            "/api/recommendations/",
            get(recommendations::list_recommendations)
                .post(recommendations::create_recommendation),
        )
        .route(
            "/api/recommendations/:id/",
            get(recommendations::get_recommendation)
                .put(recommendations::update_recommendation)
                .patch(recommendations::update_recommendation)
                .delete(recommendations::delete_recommendation),
        )
        .layer(cors)
        .with_state(state)
}
