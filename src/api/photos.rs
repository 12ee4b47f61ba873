use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::AppState;
use crate::auth::{ensure_can_modify, AuthUser, MaybeAuthUser};
use crate::domain::{neighbours, Comment, DailyPhoto, Like, NewPhoto, PhotoChanges};
use crate::error::{is_unique_violation, AppError};

#[derive(Debug, Serialize)]
pub struct PhotoDto {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub story: String,
    pub date_taken: Option<NaiveDate>,
    pub date_featured: NaiveDate,
    pub author: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comments: Vec<Comment>,
    pub likes: Vec<Like>,
}

impl PhotoDto {
    fn new(photo: DailyPhoto, comments: Vec<Comment>, likes: Vec<Like>) -> Self {
        PhotoDto {
            id: photo.id,
            title: photo.title,
            image: photo.image,
            story: photo.story,
            date_taken: photo.date_taken,
            date_featured: photo.date_featured,
            author: photo.author_id,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
            comments,
            likes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PhotoDetailResponse {
    #[serde(flatten)]
    pub photo: PhotoDto,
    pub like_count: usize,
    pub comment_count: usize,
    pub previous_id: Option<i64>,
    pub next_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
}

fn duplicate_date_featured(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::BadRequest("daily photo with this date featured already exists.".into())
    } else {
        err.into()
    }
}

pub(crate) async fn require_photo(state: &AppState, id: i64) -> Result<DailyPhoto, AppError> {
    state
        .repo
        .get_photo(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", id)))
}

async fn with_relations(state: &AppState, photo: DailyPhoto) -> Result<PhotoDto, AppError> {
    let comments = state.repo.list_comments(Some(photo.id)).await?;
    let likes = state.repo.list_likes(None, Some(photo.id)).await?;
    Ok(PhotoDto::new(photo, comments, likes))
}

pub async fn list_photos(State(state): State<AppState>) -> Result<Json<Vec<PhotoDto>>, AppError> {
    let photos = state.repo.list_photos().await?;

    let mut comments_by_photo: HashMap<i64, Vec<Comment>> = HashMap::new();
    for comment in state.repo.list_comments(None).await? {
        comments_by_photo
            .entry(comment.photo_id)
            .or_default()
            .push(comment);
    }
    let mut likes_by_photo: HashMap<i64, Vec<Like>> = HashMap::new();
    for like in state.repo.list_likes(None, None).await? {
        likes_by_photo.entry(like.photo_id).or_default().push(like);
    }

    let photos = photos
        .into_iter()
        .map(|photo| {
            let comments = comments_by_photo.remove(&photo.id).unwrap_or_default();
            let likes = likes_by_photo.remove(&photo.id).unwrap_or_default();
            PhotoDto::new(photo, comments, likes)
        })
        .collect();

    Ok(Json(photos))
}

pub async fn create_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<NewPhoto>,
) -> Result<(StatusCode, Json<PhotoDto>), AppError> {
    let photo = body.validated()?;
    let photo = state
        .repo
        .insert_photo(&photo, Some(auth.user.id))
        .await
        .map_err(duplicate_date_featured)?;

    info!(
        photo_id = photo.id,
        date_featured = %photo.date_featured,
        author_id = auth.user.id,
        "created daily photo"
    );
    Ok((
        StatusCode::CREATED,
        Json(PhotoDto::new(photo, Vec::new(), Vec::new())),
    ))
}

pub async fn get_photo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PhotoDto>, AppError> {
    let photo = require_photo(&state, id).await?;
    Ok(Json(with_relations(&state, photo).await?))
}

/// The home page photo: the one with the latest featured date.
pub async fn get_featured_photo(State(state): State<AppState>) -> Result<Json<PhotoDto>, AppError> {
    let photo = state
        .repo
        .latest_featured_photo()
        .await?
        .ok_or_else(|| AppError::NotFound("No photo has been featured yet".into()))?;
    Ok(Json(with_relations(&state, photo).await?))
}

/// A photo with counts, navigation to its featured neighbours and the caller's own state.
pub async fn get_photo_detail(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    MaybeAuthUser(auth): MaybeAuthUser,
) -> Result<Json<PhotoDetailResponse>, AppError> {
    let photo = require_photo(&state, id).await?;
    let photo = with_relations(&state, photo).await?;

    let ordered_ids = state.repo.featured_order_ids().await?;
    let nav = neighbours(&ordered_ids, id).unwrap_or_default();

    let (liked, saved) = match auth {
        Some(auth) => {
            let user_id = auth.user.id;
            let liked = photo.likes.iter().any(|l| l.user_id == user_id);
            let saved = !state
                .repo
                .list_saved_photos(Some(user_id), Some(id))
                .await?
                .is_empty();
            (Some(liked), Some(saved))
        }
        None => (None, None),
    };

    Ok(Json(PhotoDetailResponse {
        like_count: photo.likes.len(),
        comment_count: photo.comments.len(),
        previous_id: nav.previous_id,
        next_id: nav.next_id,
        liked,
        saved,
        photo,
    }))
}

pub async fn replace_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<NewPhoto>,
) -> Result<Json<PhotoDto>, AppError> {
    update_photo(state, auth, id, body.validated()?.into()).await
}

pub async fn patch_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<PhotoChanges>,
) -> Result<Json<PhotoDto>, AppError> {
    update_photo(state, auth, id, changes).await
}

async fn update_photo(
    state: AppState,
    auth: AuthUser,
    id: i64,
    changes: PhotoChanges,
) -> Result<Json<PhotoDto>, AppError> {
    let mut photo = require_photo(&state, id).await?;
    ensure_can_modify(photo.author_id, &auth.user)?;

    photo.apply(changes)?;
    let photo = state
        .repo
        .update_photo(&photo)
        .await
        .map_err(duplicate_date_featured)?;

    Ok(Json(with_relations(&state, photo).await?))
}

pub async fn delete_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    let photo = require_photo(&state, id).await?;
    ensure_can_modify(photo.author_id, &auth.user)?;

    state.repo.delete_photo(id).await?;
    info!(photo_id = id, user_id = auth.user.id, "deleted daily photo");
    Ok(StatusCode::NO_CONTENT)
}
