//! Extractors resolving `Authorization: Token <key>` to an account.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::api::AppState;
use crate::domain::User;
use crate::error::AppError;

/// An authenticated caller. Rejects the request with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

/// The caller if credentials were sent, `None` for anonymous requests.
///
/// Invalid credentials are still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve(parts, state).await?.ok_or_else(|| {
            AppError::Unauthorized("Authentication credentials were not provided.".into())
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(resolve(parts, state).await?))
    }
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let header = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid token header.".into()))?;
    let key = parse_token_header(header)?;

    let user = state
        .repo
        .find_user_by_token(key)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid token.".into()))?;
    if !user.is_active {
        return Err(AppError::Unauthorized("User inactive or deleted.".into()));
    }

    debug!(user_id = user.id, "authenticated request");
    Ok(Some(AuthUser {
        user,
        token: key.to_string(),
    }))
}

fn parse_token_header(header: &str) -> Result<&str, AppError> {
    let mut parts = header.split_whitespace();
    let (Some(scheme), Some(key), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AppError::Unauthorized("Invalid token header.".into()));
    };
    if scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer") {
        Ok(key)
    } else {
        Err(AppError::Unauthorized("Invalid token header.".into()))
    }
}
