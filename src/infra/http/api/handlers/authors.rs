//! `/authors` handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::validation::{Input, requests, validate};

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_authors(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let authors = state
        .authors
        .list_all()
        .await
        .map_err(ApiError::failed("Failed to retrieve authors"))?;

    if authors.is_empty() {
        return Err(ApiError::not_found("No authors found"));
    }

    Ok(Json(authors))
}

pub async fn show_author(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let author = state
        .authors
        .find(id)
        .await
        .map_err(ApiError::failed("Failed to retrieve author"))?;

    match author {
        Some(author) => Ok(Json(author)),
        None => Err(ApiError::not_found("Author not found")),
    }
}

pub async fn create_author(
    State(state): State<ApiState>,
    payload: Result<Json<Input>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload.map_err(ApiError::malformed)?;
    let message = "Failed to create author";

    let fields = validate(&input, &requests::store_author(), &*state.authors)
        .await
        .map_err(ApiError::rejected(message))?;
    let params = requests::create_author_params(&fields).map_err(ApiError::validation)?;

    let author = state
        .authors
        .create(params)
        .await
        .map_err(ApiError::failed(message))?;

    Ok((StatusCode::CREATED, Json(author)))
}

pub async fn update_author(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    payload: Result<Json<Input>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload.map_err(ApiError::malformed)?;
    let message = "Failed to update author";

    let fields = validate(&input, &requests::update_author(id), &*state.authors)
        .await
        .map_err(ApiError::rejected(message))?;

    let updated = state
        .authors
        .update(id, requests::update_author_params(&fields))
        .await
        .map_err(ApiError::failed(message))?;
    if !updated {
        return Err(ApiError::not_found("Author not found or could not be updated"));
    }

    // Re-read so the response carries the stored timestamps.
    let author = state
        .authors
        .find(id)
        .await
        .map_err(ApiError::failed(message))?
        .ok_or_else(|| ApiError::not_found("Author not found or could not be updated"))?;

    Ok(Json(author))
}

pub async fn delete_author(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .authors
        .delete(id)
        .await
        .map_err(ApiError::failed("Failed to delete author"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Author not found"))
    }
}

pub async fn author_books(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let message = "Failed to retrieve author books";

    let author = state
        .authors
        .find(id)
        .await
        .map_err(ApiError::failed(message))?;
    if author.is_none() {
        return Err(ApiError::not_found("Author not found"));
    }

    let books = state
        .authors
        .books(id)
        .await
        .map_err(ApiError::failed(message))?;
    if books.is_empty() {
        return Err(ApiError::not_found("No books found for this author"));
    }

    Ok(Json(books))
}
