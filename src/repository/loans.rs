//! Loans repository: the atomic borrow/return unit against Postgres

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, Pool, Postgres, Row};

use crate::{
    error::{is_foreign_key_violation, is_unique_violation, AppError, AppResult},
    models::{
        book::Book,
        loan::{not_available, BookState, Loan, LoanDetails},
    },
};

use super::books::BOOK_COLUMNS;

/// Persistence seam for the lending workflow.
///
/// Each call must run as one atomic unit: the availability check and the
/// write cannot interleave with another borrow or return of the same book,
/// even from another process.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// Create a loan if the book exists and is available
    async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<Loan>;

    /// Delete the loan held by `user_id` on `book_id`
    async fn return_book(&self, user_id: i32, book_id: i32) -> AppResult<Loan>;

    /// Loans held by a user, oldest first; `NotFound` if the user does not exist
    async fn user_loans(&self, user_id: i32) -> AppResult<Vec<LoanDetails>>;
}

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Lock the book row for the rest of the transaction; false if it does not exist
    async fn lock_book(conn: &mut PgConnection, book_id: i32) -> AppResult<bool> {
        let locked: Option<i32> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(conn)
            .await?;
        Ok(locked.is_some())
    }

    async fn active_loan(conn: &mut PgConnection, book_id: i32) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            "SELECT id, user_id, book_id, created_at FROM loans WHERE book_id = $1",
        )
        .bind(book_id)
        .fetch_optional(conn)
        .await?;
        Ok(loan)
    }
}

#[async_trait]
impl LoanStore for LoansRepository {
    async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        if !Self::lock_book(&mut *tx, book_id).await? {
            return Err(not_available(book_id));
        }

        let current = Self::active_loan(&mut *tx, book_id).await?;
        BookState::from_active_loan(current.as_ref()).check_borrow(book_id)?;

        // The unique index on loans.book_id backs up the row lock
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (user_id, book_id)
            VALUES ($1, $2)
            RETURNING id, user_id, book_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                not_available(book_id)
            } else if is_foreign_key_violation(&e) {
                AppError::NotFound(format!("User with id {} not found", user_id))
            } else {
                e.into()
            }
        })?;

        tx.commit().await?;
        Ok(loan)
    }

    async fn return_book(&self, user_id: i32, book_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let exists = Self::lock_book(&mut *tx, book_id).await?;
        let current = if exists {
            Self::active_loan(&mut *tx, book_id).await?
        } else {
            None
        };
        let loan_id = BookState::from_active_loan(current.as_ref()).check_return(user_id, book_id)?;

        let loan = sqlx::query_as::<_, Loan>(
            "DELETE FROM loans WHERE id = $1 RETURNING id, user_id, book_id, created_at",
        )
        .bind(loan_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(loan)
    }

    async fn user_loans(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        let user_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        if !user_exists {
            return Err(AppError::NotFound(format!("User with id {} not found", user_id)));
        }

        let query = format!(
            r#"
            SELECT l.id AS loan_id, l.user_id, l.created_at AS loan_created_at, {}
            FROM loans l
            JOIN books b ON b.id = l.book_id
            WHERE l.user_id = $1
            ORDER BY l.created_at, l.id
            "#,
            BOOK_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            result.push(LoanDetails {
                id: row.try_get("loan_id")?,
                user_id: row.try_get("user_id")?,
                created_at: row.try_get("loan_created_at")?,
                book: Book::from_row(&row)?,
            });
        }

        Ok(result)
    }
}
