//! Book (catalog) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book as listed in the catalog
///
/// `available` is not stored: it is computed from the absence of a loan
/// referencing the book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub author: String,
    pub description: String,
    /// Cover path relative to `/assets`
    pub cover: Option<String>,
    /// Genre labels, sorted by name
    pub genres: Vec<String>,
    pub available: bool,
}
