use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::photos::require_photo;
use crate::api::AppState;
use crate::auth::{ensure_can_modify, AuthUser};
use crate::domain::{require_text, Comment};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    pub photo_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub photo_id: i64,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: String,
}

async fn require_comment(state: &AppState, id: i64) -> Result<Comment, AppError> {
    state
        .repo
        .get_comment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))
}

pub async fn list_comments(
    ApiQuery(params): ApiQuery<CommentsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Comment>>, AppError> {
    Ok(Json(state.repo.list_comments(params.photo_id).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let text = require_text("text", &body.text)?;
    let photo = require_photo(&state, body.photo_id).await?;

    let comment = state
        .repo
        .insert_comment(auth.user.id, photo.id, &text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Comment>, AppError> {
    Ok(Json(require_comment(&state, id).await?))
}

pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<UpdateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    let comment = require_comment(&state, id).await?;
    ensure_can_modify(Some(comment.user_id), &auth.user)?;

    let text = require_text("text", &body.text)?;
    state.repo.update_comment_text(id, &text).await?;
    Ok(Json(Comment { text, ..comment }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    let comment = require_comment(&state, id).await?;
    ensure_can_modify(Some(comment.user_id), &auth.user)?;

    state.repo.delete_comment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
