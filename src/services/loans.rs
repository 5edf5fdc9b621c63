//! Lending service: borrow and return of single-copy books

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::loan::{Loan, LoanDetails},
    repository::LoanStore,
};

#[derive(Clone)]
pub struct LoansService {
    store: Arc<dyn LoanStore>,
}

impl LoansService {
    pub fn new(store: Arc<dyn LoanStore>) -> Self {
        Self { store }
    }

    /// Borrow a book for a user
    pub async fn borrow_book(&self, user_id: i32, book_id: i32) -> AppResult<Loan> {
        let loan = self.store.borrow(user_id, book_id).await?;
        tracing::info!(user_id, book_id, loan_id = loan.id, "Book borrowed");
        Ok(loan)
    }

    /// Return a book the user has borrowed
    pub async fn return_book(&self, user_id: i32, book_id: i32) -> AppResult<Loan> {
        let loan = self.store.return_book(user_id, book_id).await?;
        tracing::info!(user_id, book_id, loan_id = loan.id, "Book returned");
        Ok(loan)
    }

    /// Get loans for a user
    pub async fn get_user_loans(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.store.user_loans(user_id).await
    }
}
