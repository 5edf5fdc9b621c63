//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, loans, profile};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Booklend API",
        version = "1.0.0",
        description = "Single-copy book lending REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::recover,
        auth::confirm_reset,
        auth::reset_password,
        // Books
        books::list_books,
        books::get_book,
        books::borrow_book,
        books::return_book,
        // Loans
        loans::my_loans,
        // Profile
        profile::update_profile,
        profile::update_password,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::ConfirmResetResponse,
            crate::models::password_reset::RecoverRequest,
            crate::models::password_reset::ConfirmResetRequest,
            crate::models::password_reset::ResetPasswordRequest,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateProfile,
            crate::models::user::UpdatePassword,
            profile::ProfileResponse,
            // Books and loans
            crate::models::book::Book,
            crate::models::loan::Loan,
            crate::models::loan::LoanDetails,
            books::LoanResponse,
            // Common
            crate::api::MessageResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Signup, login and password recovery"),
        (name = "books", description = "Catalog, borrow and return"),
        (name = "loans", description = "Loans of the current user"),
        (name = "profile", description = "Profile of the current user")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/auth/signup",
            "/auth/reset/update",
            "/books",
            "/books/{id}/borrow",
            "/books/{id}/return",
            "/me/loans",
            "/me/password",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
