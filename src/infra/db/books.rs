use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::{Date, OffsetDateTime};

use crate::{
    application::repos::{BookStore, CreateBookParams, StoreError, UpdateBookParams},
    domain::entities::Book,
};

use super::{
    PostgresStore, map_sqlx_error,
    util::{to_i64, to_u64},
};

pub(super) const BOOK_COLUMNS: &str =
    "id, title, description, publish_date, author_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub(super) struct BookRow {
    id: i64,
    title: String,
    description: Option<String>,
    publish_date: Option<Date>,
    author_id: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            publish_date: row.publish_date,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl BookStore for PostgresStore {
    async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY id"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn list_books_page(&self, limit: u64, offset: u64) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(to_i64(limit)?)
        .bind(to_i64(offset)?)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn count_books(&self) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        to_u64(count)
    }

    async fn find_book(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Book::from))
    }

    async fn create_book(&self, params: CreateBookParams) -> Result<Book, StoreError> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "INSERT INTO books (title, description, publish_date, author_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(params.title)
        .bind(params.description)
        .bind(params.publish_date)
        .bind(params.author_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_book(&self, id: i64, params: UpdateBookParams) -> Result<bool, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE books SET ");
        let mut assignments = qb.separated(", ");
        if let Some(title) = params.title {
            assignments.push("title = ").push_bind_unseparated(title);
        }
        if let Some(author_id) = params.author_id {
            assignments
                .push("author_id = ")
                .push_bind_unseparated(author_id);
        }
        if let Some(description) = params.description {
            assignments
                .push("description = ")
                .push_bind_unseparated(description);
        }
        if let Some(publish_date) = params.publish_date {
            assignments
                .push("publish_date = ")
                .push_bind_unseparated(publish_date);
        }
        assignments.push("updated_at = NOW()");

        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let result = qb
            .build()
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_book(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
