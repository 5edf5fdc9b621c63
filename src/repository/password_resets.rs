//! Password reset codes repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::password_reset::PasswordReset};

#[derive(Clone)]
pub struct PasswordResetsRepository {
    pool: Pool<Postgres>,
}

impl PasswordResetsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Drop the user's previous codes and store a new one
    pub async fn replace_for_user(
        &self,
        user_id: i32,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<PasswordReset> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM password_resets WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let reset = sqlx::query_as::<_, PasswordReset>(
            r#"
            INSERT INTO password_resets (user_id, code, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, code, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(code)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(reset)
    }

    /// Most recent unexpired reset carrying `code`
    pub async fn find_valid_by_code(&self, code: &str, now: DateTime<Utc>) -> AppResult<Option<PasswordReset>> {
        let reset = sqlx::query_as::<_, PasswordReset>(
            r#"
            SELECT id, user_id, code, expires_at, created_at
            FROM password_resets
            WHERE code = $1 AND expires_at > $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reset)
    }

    /// Unexpired reset of `user_id` carrying `code`
    pub async fn find_valid_for_user(
        &self,
        user_id: i32,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<PasswordReset>> {
        let reset = sqlx::query_as::<_, PasswordReset>(
            r#"
            SELECT id, user_id, code, expires_at, created_at
            FROM password_resets
            WHERE user_id = $1 AND code = $2 AND expires_at > $3
            "#,
        )
        .bind(user_id)
        .bind(code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reset)
    }
}
