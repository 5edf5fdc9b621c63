//! Loan listing endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::loan::LoanDetails, AppState};

use super::AuthenticatedUser;

/// Loans of the authenticated user, with the borrowed books
#[utoipa::path(
    get,
    path = "/me/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active loans", body = Vec<LoanDetails>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn my_loans(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.get_user_loans(claims.user_id).await?;
    Ok(Json(loans))
}
