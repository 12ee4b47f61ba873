use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::AppState;
use crate::auth::{ensure_can_modify, ensure_staff, AuthUser};
use crate::domain::{NewRecommendation, PhotoRecommendation, RecommendationChanges};
use crate::error::AppError;

async fn require_recommendation(
    state: &AppState,
    id: i64,
) -> Result<PhotoRecommendation, AppError> {
    state
        .repo
        .get_recommendation(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Recommendation {} not found", id)))
}

/// Newest first. Staff see every submission, everyone else only their own.
pub async fn list_recommendations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PhotoRecommendation>>, AppError> {
    let scope = (!auth.user.is_staff).then_some(auth.user.id);
    Ok(Json(state.repo.list_recommendations(scope).await?))
}

pub async fn create_recommendation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<NewRecommendation>,
) -> Result<(StatusCode, Json<PhotoRecommendation>), AppError> {
    let body = body.validated()?;
    let recommendation = state
        .repo
        .insert_recommendation(auth.user.id, &body)
        .await?;

    info!(
        recommendation_id = recommendation.id,
        user_id = auth.user.id,
        "recommendation submitted"
    );
    Ok((StatusCode::CREATED, Json(recommendation)))
}

pub async fn get_recommendation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PhotoRecommendation>, AppError> {
    let recommendation = require_recommendation(&state, id).await?;
    ensure_can_modify(Some(recommendation.user_id), &auth.user)?;
    Ok(Json(recommendation))
}

/// Owners edit content; only staff move the moderation status.
pub async fn update_recommendation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<RecommendationChanges>,
) -> Result<Json<PhotoRecommendation>, AppError> {
    let mut recommendation = require_recommendation(&state, id).await?;
    ensure_can_modify(Some(recommendation.user_id), &auth.user)?;

    if changes
        .status
        .is_some_and(|status| status != recommendation.status)
    {
        ensure_staff(&auth.user)?;
    }

    let previous_status = recommendation.status;
    let reviewed = recommendation.apply(changes, Utc::now())?;
    if !state
        .repo
        .update_recommendation(&recommendation, previous_status)
        .await?
    {
        return Err(AppError::Conflict(
            "This recommendation was reviewed by someone else; reload and try again.".into(),
        ));
    }

    if reviewed {
        info!(
            recommendation_id = id,
            status = %recommendation.status,
            reviewer_id = auth.user.id,
            "recommendation reviewed"
        );
    }
    Ok(Json(recommendation))
}

pub async fn delete_recommendation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    let recommendation = require_recommendation(&state, id).await?;
    ensure_can_modify(Some(recommendation.user_id), &auth.user)?;

    state.repo.delete_recommendation(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
