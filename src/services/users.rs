//! Accounts service: signup, login, password recovery and profile updates

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use rand::Rng;

use crate::{
    config::{AuthConfig, PasswordResetConfig},
    error::{AppError, AppResult},
    models::{
        password_reset::{ResetPasswordRequest, RESET_CODE_LENGTH},
        user::{CreateUser, UpdatePassword, UpdateProfile, User, UserClaims, MIN_PASSWORD_LENGTH},
    },
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    auth: AuthConfig,
    reset: PasswordResetConfig,
    email: EmailService,
}

/// Verified when no account matches a login, so unknown emails cost one Argon2 run too
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let secret: u64 = rand::thread_rng().gen();
    hash_password(&secret.to_string()).ok()
});

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Four-digit reset code, uniformly in 1000..=9999
pub fn generate_reset_code() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

impl UsersService {
    pub fn new(
        repository: Repository,
        auth: AuthConfig,
        reset: PasswordResetConfig,
        email: EmailService,
    ) -> Self {
        Self {
            repository,
            auth,
            reset,
            email,
        }
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, self.auth.jwt_expiration_hours)
            .create_token(&self.auth.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Create a new account
    pub async fn signup(&self, user: CreateUser) -> AppResult<User> {
        if self.repository.users.email_exists(user.email.trim(), None).await? {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }

        let password = hash_password(&user.password)?;
        let created = self.repository.users.create(&user, &password).await?;

        tracing::info!(user_id = created.id, "User signed up");
        Ok(created)
    }

    /// Authenticate by email and password; returns a JWT and the user
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let invalid = || AppError::Authentication("Invalid email or password".to_string());

        let Some(user) = self.repository.users.get_by_email(email.trim()).await? else {
            if let Some(hash) = DUMMY_HASH.as_deref() {
                let _ = verify_password(hash, password);
            }
            return Err(invalid());
        };

        if !verify_password(&user.password, password)? {
            return Err(invalid());
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Issue a reset code for `email` and send it
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let user = self
            .repository
            .users
            .get_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("No user found with this email".to_string()))?;

        let code = generate_reset_code();
        let expires_at = Utc::now() + Duration::minutes(self.reset.code_ttl_minutes);
        self.repository
            .password_resets
            .replace_for_user(user.id, &code, expires_at)
            .await?;

        tracing::info!(user_id = user.id, "Password reset code issued");

        self.email
            .send_reset_code(&user.email, &code, self.reset.code_ttl_minutes)
            .await
    }

    /// Check a reset code; returns the user it belongs to
    pub async fn confirm_reset_code(&self, code: &str) -> AppResult<i32> {
        if code.chars().count() != RESET_CODE_LENGTH {
            return Err(AppError::Validation("Invalid code".to_string()));
        }

        let reset = self
            .repository
            .password_resets
            .find_valid_by_code(code, Utc::now())
            .await?
            .ok_or_else(|| AppError::Validation("Code expired or invalid".to_string()))?;

        Ok(reset.user_id)
    }

    /// Set a new password using a still-valid reset code
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> AppResult<()> {
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation("Invalid information".to_string()));
        }

        self.repository.users.get_by_id(request.user_id).await?;

        self.repository
            .password_resets
            .find_valid_for_user(request.user_id, &request.code, Utc::now())
            .await?
            .ok_or_else(|| AppError::Validation("Code expired or invalid".to_string()))?;

        let password = hash_password(&request.password)?;
        self.repository
            .users
            .reset_password(request.user_id, &password)
            .await?;

        tracing::info!(user_id = request.user_id, "Password reset");
        Ok(())
    }

    /// Update own name and email; returns the user and a token carrying the new claims
    pub async fn update_profile(&self, user_id: i32, profile: UpdateProfile) -> AppResult<(String, User)> {
        if self
            .repository
            .users
            .email_exists(profile.email.trim(), Some(user_id))
            .await?
        {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }

        let user = self.repository.users.update_profile(user_id, &profile).await?;
        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Change own password after checking the current one
    pub async fn update_password(&self, user_id: i32, request: UpdatePassword) -> AppResult<()> {
        if request.new_password != request.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        let user = self.repository.users.get_by_id(user_id).await?;

        if !verify_password(&user.password, &request.current_password)? {
            return Err(AppError::Validation("Current password is incorrect".to_string()));
        }

        let password = hash_password(&request.new_password)?;
        self.repository.users.update_password(user_id, &password).await
    }
}
