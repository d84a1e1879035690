use std::error::Error as StdError;

use axum::{http::StatusCode, response::Response};
use thiserror::Error;
use tracing::error;

use crate::{application::repos::StoreError, infra::error::InfraError};

/// Diagnostic chain attached to error responses for the logging middleware.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// A store fault rewrapped with the operation that was being attempted.
#[derive(Debug, Error)]
#[error("Failed to {action}: {source}")]
pub struct RepositoryError {
    action: &'static str,
    #[source]
    source: StoreError,
}

impl RepositoryError {
    pub fn new(action: &'static str, source: StoreError) -> Self {
        Self { action, source }
    }

    pub fn action(&self) -> &'static str {
        self.action
    }
}

/// Builds the `map_err` adapter used by the repositories: logs the fault, then rewraps it.
pub(crate) fn operation_failed(action: &'static str) -> impl FnOnce(StoreError) -> RepositoryError {
    move |source| {
        error!(
            target = "bookshelf::repository",
            action,
            error = %source,
            "store operation failed"
        );
        RepositoryError::new(action, source)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_error_prefixes_the_failed_action() {
        let err = RepositoryError::new(
            "create a new author",
            StoreError::from_persistence("connection reset by peer"),
        );

        assert_eq!(
            err.to_string(),
            "Failed to create a new author: persistence error: connection reset by peer"
        );
        assert_eq!(err.action(), "create a new author");
    }

    #[test]
    fn error_report_walks_the_source_chain() {
        let err = RepositoryError::new("delete the book", StoreError::Timeout);
        let report = ErrorReport::from_error(
            "tests",
            StatusCode::INTERNAL_SERVER_ERROR,
            &err,
        );

        assert_eq!(
            report.messages,
            vec![
                "Failed to delete the book: database timeout".to_string(),
                "database timeout".to_string(),
            ]
        );
    }
}
