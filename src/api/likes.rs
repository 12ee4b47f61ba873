use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::api::extract::ApiPath;
use crate::api::photos::require_photo;
use crate::api::AppState;
use crate::auth::{ensure_can_modify, AuthUser};
use crate::domain::Like;
use crate::error::AppError;

/// Body of `like_photo` and `save_photo`.
#[derive(Debug, Deserialize)]
pub struct PhotoActionRequest {
    pub photo_id: Option<i64>,
}

impl PhotoActionRequest {
    /// The requested photo id. A request sent without a JSON body counts as
    /// not naming one.
    pub fn photo_id_from(
        body: Result<Json<PhotoActionRequest>, JsonRejection>,
    ) -> Result<i64, AppError> {
        let photo_id = match body {
            Ok(Json(body)) => body.photo_id,
            Err(JsonRejection::MissingJsonContentType(_)) => None,
            Err(rejection) => return Err(rejection.into()),
        };
        photo_id.ok_or_else(|| AppError::BadRequest("photo_id is required.".into()))
    }
}

async fn require_like(state: &AppState, id: i64) -> Result<Like, AppError> {
    state
        .repo
        .get_like(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Like {} not found", id)))
}

/// The caller's likes.
pub async fn list_likes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Like>>, AppError> {
    Ok(Json(state.repo.list_likes(Some(auth.user.id), None).await?))
}

/// Like a photo once; a repeat like is acknowledged without creating anything.
pub async fn like_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<PhotoActionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let photo_id = PhotoActionRequest::photo_id_from(body)?;
    let photo = require_photo(&state, photo_id).await?;

    match state.repo.insert_like(auth.user.id, photo.id).await? {
        Some(like) => Ok((StatusCode::CREATED, Json(like)).into_response()),
        None => {
            debug!(user_id = auth.user.id, photo_id, "photo already liked");
            Ok((
                StatusCode::OK,
                Json(json!({"message": "You have already liked this photo."})),
            )
                .into_response())
        }
    }
}

pub async fn get_like(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Like>, AppError> {
    let like = require_like(&state, id).await?;
    ensure_can_modify(Some(like.user_id), &auth.user)?;
    Ok(Json(like))
}

pub async fn delete_like(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    let like = require_like(&state, id).await?;
    ensure_can_modify(Some(like.user_id), &auth.user)?;

    state.repo.delete_like(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
