use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::db::SCHEMA_VERSION;
use crate::error::AppError;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once the database answers.
pub async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    state.repo.ping().await?;
    Ok(Json(serde_json::json!({
        "status": "ready",
        "schema_version": SCHEMA_VERSION,
    })))
}
