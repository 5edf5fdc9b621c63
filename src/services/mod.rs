//! Business logic services

pub mod books;
pub mod email;
pub mod loans;
pub mod users;

use std::sync::Arc;

use crate::{
    config::{AuthConfig, EmailConfig, PasswordResetConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub loans: loans::LoansService,
    pub users: users::UsersService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        reset_config: PasswordResetConfig,
        email_config: EmailConfig,
    ) -> Self {
        let email = email::EmailService::new(email_config);

        Self {
            books: books::BooksService::new(repository.clone()),
            loans: loans::LoansService::new(Arc::new(repository.loans.clone())),
            users: users::UsersService::new(repository.clone(), auth_config, reset_config, email),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
