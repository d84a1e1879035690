//! Store ports describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::Date;

use crate::domain::entities::{Author, Book};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl StoreError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateAuthorParams {
    pub name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub birth_date: Option<Date>,
}

/// Partial author update. `None` leaves a column untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateAuthorParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<Option<String>>,
    pub birth_date: Option<Option<Date>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateBookParams {
    pub title: String,
    pub author_id: i64,
    pub description: Option<String>,
    pub publish_date: Option<Date>,
}

/// Partial book update. `None` leaves a column untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBookParams {
    pub title: Option<String>,
    pub author_id: Option<i64>,
    pub description: Option<Option<String>>,
    pub publish_date: Option<Option<Date>>,
}

#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// All authors in insertion order.
    async fn list_authors(&self) -> Result<Vec<Author>, StoreError>;

    async fn find_author(&self, id: i64) -> Result<Option<Author>, StoreError>;

    async fn create_author(&self, params: CreateAuthorParams) -> Result<Author, StoreError>;

    /// Returns `false` when no author has the given id.
    async fn update_author(&self, id: i64, params: UpdateAuthorParams)
    -> Result<bool, StoreError>;

    /// Returns `false` when no author has the given id. Books of the author go with it.
    async fn delete_author(&self, id: i64) -> Result<bool, StoreError>;

    async fn list_books_for_author(&self, author_id: i64) -> Result<Vec<Book>, StoreError>;

    async fn author_exists(&self, id: i64) -> Result<bool, StoreError>;

    async fn author_email_taken(
        &self,
        email: &str,
        ignore_id: Option<i64>,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books in insertion order.
    async fn list_books(&self) -> Result<Vec<Book>, StoreError>;

    async fn list_books_page(&self, limit: u64, offset: u64) -> Result<Vec<Book>, StoreError>;

    async fn count_books(&self) -> Result<u64, StoreError>;

    async fn find_book(&self, id: i64) -> Result<Option<Book>, StoreError>;

    async fn create_book(&self, params: CreateBookParams) -> Result<Book, StoreError>;

    /// Returns `false` when no book has the given id.
    async fn update_book(&self, id: i64, params: UpdateBookParams) -> Result<bool, StoreError>;

    /// Returns `false` when no book has the given id.
    async fn delete_book(&self, id: i64) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}
