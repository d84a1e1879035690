//! Author repository: store access with error translation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::error::{RepositoryError, operation_failed};
use crate::application::repos::{AuthorStore, CreateAuthorParams, UpdateAuthorParams};
use crate::application::validation::ReferenceCheck;
use crate::domain::entities::{Author, Book};

#[derive(Clone)]
pub struct AuthorRepository {
    store: Arc<dyn AuthorStore>,
}

impl AuthorRepository {
    pub fn new(store: Arc<dyn AuthorStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Author>, RepositoryError> {
        self.store
            .list_authors()
            .await
            .map_err(operation_failed("retrieve all authors"))
    }

    /// `Ok(None)` when the author does not exist.
    pub async fn find(&self, id: i64) -> Result<Option<Author>, RepositoryError> {
        self.store
            .find_author(id)
            .await
            .map_err(operation_failed("retrieve the author"))
    }

    pub async fn create(&self, params: CreateAuthorParams) -> Result<Author, RepositoryError> {
        self.store
            .create_author(params)
            .await
            .map_err(operation_failed("create a new author"))
    }

    /// Applies only the supplied fields. `Ok(false)` when the author does not exist.
    pub async fn update(
        &self,
        id: i64,
        params: UpdateAuthorParams,
    ) -> Result<bool, RepositoryError> {
        self.store
            .update_author(id, params)
            .await
            .map_err(operation_failed("update the author"))
    }

    /// Deletes the author and, through the store's cascade, its books.
    /// `Ok(false)` when the author does not exist.
    pub async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        self.store
            .delete_author(id)
            .await
            .map_err(operation_failed("delete the author"))
    }

    /// Books of the author; empty when the author is missing. Callers that need
    /// to tell the two apart check [`AuthorRepository::find`] first.
    pub async fn books(&self, id: i64) -> Result<Vec<Book>, RepositoryError> {
        self.store
            .list_books_for_author(id)
            .await
            .map_err(operation_failed("retrieve books for the author"))
    }
}

#[async_trait]
impl ReferenceCheck for AuthorRepository {
    async fn author_exists(&self, id: i64) -> Result<bool, RepositoryError> {
        self.store
            .author_exists(id)
            .await
            .map_err(operation_failed("check the author reference"))
    }

    async fn author_email_taken(
        &self,
        email: &str,
        ignore_id: Option<i64>,
    ) -> Result<bool, RepositoryError> {
        self.store
            .author_email_taken(email, ignore_id)
            .await
            .map_err(operation_failed("check the author email"))
    }
}
