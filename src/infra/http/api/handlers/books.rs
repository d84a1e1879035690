//! `/books` handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::books::BookListing;
use crate::application::validation::{Input, check_rules, requests, validate};

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::BookListQuery;
use crate::infra::http::api::state::ApiState;

/// `?page=` switches to the paginated listing; without it the cached full list is served.
pub async fn list_books(
    State(state): State<ApiState>,
    Query(query): Query<BookListQuery>,
) -> Result<Response, ApiError> {
    let fields = check_rules(
        &query.into_input(),
        &requests::book_list_query(state.max_per_page),
    )
    .map_err(ApiError::validation)?;
    let (per_page, page) = requests::book_list_args(&fields);

    let listing = state
        .books
        .list_all(per_page, page)
        .await
        .map_err(ApiError::failed("Failed to retrieve books"))?;

    if listing.is_empty() {
        return Err(ApiError::not_found("No books found"));
    }

    Ok(match listing {
        BookListing::Page(page) => Json(page).into_response(),
        BookListing::All(books) => Json(books.as_slice()).into_response(),
    })
}

pub async fn show_book(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let book = state
        .books
        .find(id)
        .await
        .map_err(ApiError::failed("Failed to retrieve book"))?;

    match book {
        Some(book) => Ok(Json(book)),
        None => Err(ApiError::not_found("Book not found")),
    }
}

pub async fn create_book(
    State(state): State<ApiState>,
    payload: Result<Json<Input>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload.map_err(ApiError::malformed)?;
    let message = "Failed to create book";

    let fields = validate(&input, &requests::store_book(), &*state.authors)
        .await
        .map_err(ApiError::rejected(message))?;
    let params = requests::create_book_params(&fields).map_err(ApiError::validation)?;

    let book = state
        .books
        .create(params)
        .await
        .map_err(ApiError::failed(message))?;

    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn update_book(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    payload: Result<Json<Input>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload.map_err(ApiError::malformed)?;
    let message = "Failed to update book";

    let fields = validate(&input, &requests::update_book(), &*state.authors)
        .await
        .map_err(ApiError::rejected(message))?;

    let updated = state
        .books
        .update(id, requests::update_book_params(&fields))
        .await
        .map_err(ApiError::failed(message))?;
    if !updated {
        return Err(ApiError::not_found("Book not found"));
    }

    let book = state
        .books
        .find(id)
        .await
        .map_err(ApiError::failed(message))?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;

    Ok(Json(book))
}

pub async fn delete_book(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .books
        .delete(id)
        .await
        .map_err(ApiError::failed("Failed to delete book"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Book not found"))
    }
}
