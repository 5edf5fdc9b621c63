//! Data models for Booklend

pub mod book;
pub mod loan;
pub mod password_reset;
pub mod user;

pub use book::Book;
pub use loan::{BookState, Loan, LoanDetails};
pub use password_reset::PasswordReset;
pub use user::{User, UserClaims};
