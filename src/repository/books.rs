//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

/// Book columns plus aggregated genres and computed availability.
/// Expects the books table aliased as `b`.
pub(crate) const BOOK_COLUMNS: &str = r#"
    b.id, b.title, b.year, b.author, b.description, b.cover,
    COALESCE((
        SELECT array_agg(g.name ORDER BY g.name)
        FROM book_genres bg
        JOIN genres g ON g.id = bg.genre_id
        WHERE bg.book_id = b.id
    ), ARRAY[]::varchar[])::text[] AS genres,
    NOT EXISTS (SELECT 1 FROM loans l WHERE l.book_id = b.id) AS available
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List every book with its genres
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {} FROM books b ORDER BY b.id", BOOK_COLUMNS);
        let books = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let query = format!("SELECT {} FROM books b WHERE b.id = $1", BOOK_COLUMNS);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }
}
