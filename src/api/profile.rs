//! Own profile and password endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{UpdatePassword, UpdateProfile, User},
    AppState,
};

use super::{extractors::ValidatedJson, AuthenticatedUser, MessageResponse};

/// Profile update response; the token replaces the one sent with the request
#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

/// Update own name and email
#[utoipa::path(
    put,
    path = "/me/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(profile): ValidatedJson<UpdateProfile>,
) -> AppResult<Json<ProfileResponse>> {
    let (token, user) = state
        .services
        .users
        .update_profile(claims.user_id, profile)
        .await?;

    Ok(Json(ProfileResponse {
        message: "Profile updated".to_string(),
        token,
        user,
    }))
}

/// Change own password
#[utoipa::path(
    put,
    path = "/me/password",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = UpdatePassword,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Mismatch, wrong current password or short password"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_password(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<UpdatePassword>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .users
        .update_password(claims.user_id, request)
        .await?;
    Ok(Json(MessageResponse::new("Password updated")))
}
