//! Loan (borrow) model and the per-book availability state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::Book;
use crate::error::{AppError, AppResult};

/// Active loan row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Loan with the borrowed book, for "my loans" listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub book: Book,
}

/// Availability state of a single-copy book.
///
/// The only transitions are `Available -> OnLoan` (borrow) and
/// `OnLoan -> Available` (return). Stores read the current state under a lock
/// and ask it whether a transition is allowed before writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    Available,
    OnLoan { loan_id: i32, user_id: i32 },
}

impl BookState {
    pub fn from_active_loan(loan: Option<&Loan>) -> Self {
        match loan {
            Some(loan) => BookState::OnLoan {
                loan_id: loan.id,
                user_id: loan.user_id,
            },
            None => BookState::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, BookState::Available)
    }

    /// Check that `book_id` may be borrowed
    pub fn check_borrow(&self, book_id: i32) -> AppResult<()> {
        match self {
            BookState::Available => Ok(()),
            BookState::OnLoan { .. } => Err(not_available(book_id)),
        }
    }

    /// Check that `user_id` holds the loan on `book_id`; returns the loan id to delete
    pub fn check_return(&self, user_id: i32, book_id: i32) -> AppResult<i32> {
        match *self {
            BookState::OnLoan {
                loan_id,
                user_id: holder,
            } if holder == user_id => Ok(loan_id),
            _ => Err(no_active_loan(user_id, book_id)),
        }
    }
}

pub fn not_available(book_id: i32) -> AppError {
    AppError::NotAvailable(format!("Book {} is not available", book_id))
}

pub fn no_active_loan(user_id: i32, book_id: i32) -> AppError {
    AppError::NoActiveLoan(format!(
        "No active loan of book {} for user {}",
        book_id, user_id
    ))
}
