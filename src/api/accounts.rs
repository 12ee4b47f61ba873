//! Registration, login/logout, profile and password endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::extract::ApiJson;
use crate::api::AppState;
use crate::auth::{hash_password_blocking, verify_password_blocking, AuthUser};
use crate::domain::{validate_email, validate_username, NewUser, ProfileChanges, User};
use crate::error::{is_unique_violation, AppError};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisteredUserDto {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: RegisteredUserDto,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

impl From<User> for ProfileDto {
    fn from(user: User) -> Self {
        ProfileDto {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            profile_picture: user.profile_picture,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn require_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::BadRequest(
            "password: This field may not be blank.".into(),
        ));
    }
    Ok(())
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let username = validate_username(&body.username)?;
    let email = validate_email(&body.email)?;
    require_password(&body.password)?;

    let password_hash =
        hash_password_blocking(body.password, state.config.password_hash_iterations).await?;
    let user = state
        .repo
        .create_user(&NewUser {
            username,
            email,
            password_hash,
            is_staff: false,
        })
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::BadRequest("A user with that username already exists.".into())
            } else {
                e.into()
            }
        })?;

    let token = state.repo.get_or_create_token(user.id).await?;
    info!(user_id = user.id, username = %user.username, "registered user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: RegisteredUserDto {
                id: user.id,
                username: user.username,
                email: user.email,
            },
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let invalid = || AppError::BadRequest("Unable to log in with provided credentials.".into());

    let (user, hash) = state
        .repo
        .get_credentials(body.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let verified = match verify_password_blocking(body.password, hash).await {
        Ok(verified) => verified,
        Err(e) => {
            warn!(user_id = user.id, "stored password hash unusable: {}", e);
            false
        }
    };
    if !verified || !user.is_active {
        return Err(invalid());
    }

    state.repo.touch_last_login(user.id).await?;
    let token = state.repo.get_or_create_token(user.id).await?;
    info!(user_id = user.id, "user logged in");

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        username: user.username,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete_token(&auth.token).await?;
    info!(user_id = auth.user.id, "user logged out");
    Ok(Json(MessageResponse {
        message: "Successfully logged out.".into(),
    }))
}

pub async fn get_profile(auth: AuthUser) -> Json<ProfileDto> {
    Json(auth.user.into())
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(changes): ApiJson<ProfileChanges>,
) -> Result<Json<ProfileDto>, AppError> {
    let mut user = auth.user;
    user.apply(changes)?;
    state.repo.update_profile(&user).await?;
    Ok(Json(user.into()))
}

pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    state.repo.delete_user(auth.user.id).await?;
    info!(user_id = auth.user.id, "deleted account");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (_, hash) = state
        .repo
        .get_credentials(&auth.user.username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !verify_password_blocking(body.old_password, hash)
        .await
        .unwrap_or(false)
    {
        return Err(AppError::BadRequest("old_password: Wrong password.".into()));
    }
    if body.new_password.is_empty() {
        return Err(AppError::BadRequest(
            "new_password: This field may not be blank.".into(),
        ));
    }

    let new_hash =
        hash_password_blocking(body.new_password, state.config.password_hash_iterations).await?;
    state.repo.set_password_hash(auth.user.id, &new_hash).await?;
    info!(user_id = auth.user.id, "password changed");

    Ok(Json(MessageResponse {
        message: "Password updated successfully.".into(),
    }))
}
