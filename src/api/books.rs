//! Catalog and borrow/return endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{book::Book, loan::Loan},
    AppState,
};

use super::{extractors::ApiPath, AuthenticatedUser};

/// Borrow/return response
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    pub message: String,
    pub loan: Loan,
}

/// List all books with their genres
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list_books().await?;
    Ok(Json(books))
}

/// Get one book
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 400, description = "Book ID is not a number"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_book(id).await?;
    Ok(Json(book))
}

/// Borrow a book for the authenticated user
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book borrowed", body = LoanResponse),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Book missing or already on loan")
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(book_id): ApiPath<i32>,
) -> AppResult<Json<LoanResponse>> {
    let loan = state
        .services
        .loans
        .borrow_book(claims.user_id, book_id)
        .await?;

    Ok(Json(LoanResponse {
        message: "Book borrowed successfully".to_string(),
        loan,
    }))
}

/// Return a book borrowed by the authenticated user
#[utoipa::path(
    delete,
    path = "/books/{id}/return",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = LoanResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No active loan of this book for the user")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(book_id): ApiPath<i32>,
) -> AppResult<Json<LoanResponse>> {
    let loan = state
        .services
        .loans
        .return_book(claims.user_id, book_id)
        .await?;

    Ok(Json(LoanResponse {
        message: "Book returned successfully".to_string(),
        loan,
    }))
}
