use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::debug;

use crate::api::extract::ApiPath;
use crate::api::likes::PhotoActionRequest;
use crate::api::photos::require_photo;
use crate::api::AppState;
use crate::auth::{ensure_can_modify, AuthUser};
use crate::domain::SavedPhoto;
use crate::error::AppError;

async fn require_saved_photo(state: &AppState, id: i64) -> Result<SavedPhoto, AppError> {
    state
        .repo
        .get_saved_photo(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Saved photo {} not found", id)))
}

/// The caller's saved photos, most recently saved first.
pub async fn list_saved_photos(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SavedPhoto>>, AppError> {
    Ok(Json(
        state
            .repo
            .list_saved_photos(Some(auth.user.id), None)
            .await?,
    ))
}

pub async fn save_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<PhotoActionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let photo_id = PhotoActionRequest::photo_id_from(body)?;
    let photo = require_photo(&state, photo_id).await?;

    match state.repo.insert_saved_photo(auth.user.id, photo.id).await? {
        Some(saved) => Ok((StatusCode::CREATED, Json(saved)).into_response()),
        None => {
            debug!(user_id = auth.user.id, photo_id, "photo already saved");
            Ok((
                StatusCode::OK,
                Json(json!({"message": "Photo already saved."})),
            )
                .into_response())
        }
    }
}

pub async fn get_saved_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<SavedPhoto>, AppError> {
    let saved = require_saved_photo(&state, id).await?;
    ensure_can_modify(Some(saved.user_id), &auth.user)?;
    Ok(Json(saved))
}

pub async fn delete_saved_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    let saved = require_saved_photo(&state, id).await?;
    ensure_can_modify(Some(saved.user_id), &auth.user)?;

    state.repo.delete_saved_photo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
