use std::error::Error as StdError;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::{ErrorReport, RepositoryError};
use crate::application::validation::{FieldErrors, ValidationError};

use super::models::{FailureBody, MessageBody, ValidationBody};

const SOURCE: &str = "infra::http::api";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiErrorBody {
    Message(MessageBody),
    Failure(FailureBody),
    Validation(ValidationBody),
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
    report: ErrorReport,
}

impl ApiError {
    pub fn not_found(message: &'static str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ApiErrorBody::Message(MessageBody {
                message: message.to_string(),
            }),
            report: ErrorReport::from_message(SOURCE, StatusCode::NOT_FOUND, message),
        }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        let status = StatusCode::UNPROCESSABLE_ENTITY;
        Self {
            status,
            report: ErrorReport::from_message(SOURCE, status, errors.to_string()),
            body: ApiErrorBody::Validation(ValidationBody { errors }),
        }
    }

    pub fn malformed(rejection: JsonRejection) -> Self {
        let status = StatusCode::BAD_REQUEST;
        Self {
            status,
            report: ErrorReport::from_error(SOURCE, status, &rejection),
            body: ApiErrorBody::Failure(FailureBody {
                message: "Malformed JSON body".to_string(),
                error: rejection.body_text(),
            }),
        }
    }

    /// A 500 naming the failed operation, with the underlying cause in `error`.
    pub fn failure(message: &'static str, err: &(dyn StdError + 'static)) -> Self {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        Self {
            status,
            report: ErrorReport::from_error(SOURCE, status, err),
            body: ApiErrorBody::Failure(FailureBody {
                message: message.to_string(),
                error: err.to_string(),
            }),
        }
    }

    /// Adapter for `map_err` on repository calls.
    pub fn failed(message: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |err| Self::failure(message, &err)
    }

    /// Field errors become a 422; a store fault during lookups becomes a 500.
    pub fn rejected(message: &'static str) -> impl FnOnce(ValidationError) -> Self {
        move |err| match err {
            ValidationError::Invalid(errors) => Self::validation(errors),
            ValidationError::Lookup(err) => Self::failure(message, &err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        self.report.attach(&mut response);
        response
    }
}
