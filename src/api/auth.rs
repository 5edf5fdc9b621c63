//! Authentication endpoints: signup, login and password recovery

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        password_reset::{ConfirmResetRequest, RecoverRequest, ResetPasswordRequest},
        user::{CreateUser, User},
    },
    AppState,
};

use super::{extractors::ValidatedJson, MessageResponse};

/// Login request
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: User,
}

/// Reset code confirmation response
#[derive(Serialize, ToSchema)]
pub struct ConfirmResetResponse {
    pub message: String,
    pub user_id: i32,
}

/// Create an account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing field, invalid email or short password"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(user): ValidatedJson<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let created = state.services.users.signup(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Malformed body or missing field"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user,
    }))
}

/// Email a password reset code
#[utoipa::path(
    post,
    path = "/auth/recover",
    tag = "auth",
    request_body = RecoverRequest,
    responses(
        (status = 200, description = "Code sent", body = MessageResponse),
        (status = 404, description = "No user with this email"),
        (status = 502, description = "Email delivery failed")
    )
)]
pub async fn recover(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RecoverRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .users
        .request_password_reset(&request.email)
        .await?;
    Ok(Json(MessageResponse::new("Code sent by email")))
}

/// Check a reset code
#[utoipa::path(
    post,
    path = "/auth/reset/confirm",
    tag = "auth",
    request_body = ConfirmResetRequest,
    responses(
        (status = 200, description = "Code is valid", body = ConfirmResetResponse),
        (status = 400, description = "Code invalid or expired")
    )
)]
pub async fn confirm_reset(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ConfirmResetRequest>,
) -> AppResult<Json<ConfirmResetResponse>> {
    let user_id = state.services.users.confirm_reset_code(&request.code).await?;
    Ok(Json(ConfirmResetResponse {
        message: "Code is valid".to_string(),
        user_id,
    }))
}

/// Set a new password with a confirmed code
#[utoipa::path(
    post,
    path = "/auth/reset/update",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid information or code"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.services.users.reset_password(request).await?;
    Ok(Json(MessageResponse::new("Password updated")))
}
