//! Password recovery codes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Number of decimal digits in a reset code
pub const RESET_CODE_LENGTH: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PasswordReset {
    pub id: i32,
    pub user_id: i32,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Request a reset code by email
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecoverRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

/// Check a reset code
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConfirmResetRequest {
    #[validate(length(equal = 4, message = "Invalid code"))]
    pub code: String,
}

/// Set a new password with a confirmed code
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    pub user_id: i32,
    #[validate(length(equal = 4, message = "Invalid code"))]
    pub code: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}
