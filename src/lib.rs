//! Booklend Server
//!
//! A REST JSON API for a small lending library: accounts with emailed
//! password recovery, a book catalog, and borrow/return of single-copy books
//! where a book is available exactly when nobody holds a loan on it.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        let services = services::Services::new(
            repository,
            config.auth.clone(),
            config.password_reset.clone(),
            config.email.clone(),
        );

        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
