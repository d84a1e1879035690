use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::{Date, OffsetDateTime};

use crate::{
    application::repos::{AuthorStore, CreateAuthorParams, StoreError, UpdateAuthorParams},
    domain::entities::{Author, Book},
};

use super::{PostgresStore, books::BookRow, map_sqlx_error};

const AUTHOR_COLUMNS: &str = "id, name, email, bio, birth_date, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: i64,
    name: String,
    email: Option<String>,
    bio: Option<String>,
    birth_date: Option<Date>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            bio: row.bio,
            birth_date: row.birth_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl AuthorStore for PostgresStore {
    async fn list_authors(&self) -> Result<Vec<Author>, StoreError> {
        let rows = sqlx::query_as::<_, AuthorRow>(&format!(
            "SELECT {AUTHOR_COLUMNS} FROM authors ORDER BY id"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Author::from).collect())
    }

    async fn find_author(&self, id: i64) -> Result<Option<Author>, StoreError> {
        let row = sqlx::query_as::<_, AuthorRow>(&format!(
            "SELECT {AUTHOR_COLUMNS} FROM authors WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Author::from))
    }

    async fn create_author(&self, params: CreateAuthorParams) -> Result<Author, StoreError> {
        let row = sqlx::query_as::<_, AuthorRow>(&format!(
            "INSERT INTO authors (name, email, bio, birth_date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {AUTHOR_COLUMNS}"
        ))
        .bind(params.name)
        .bind(params.email)
        .bind(params.bio)
        .bind(params.birth_date)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_author(
        &self,
        id: i64,
        params: UpdateAuthorParams,
    ) -> Result<bool, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE authors SET ");
        let mut assignments = qb.separated(", ");
        if let Some(name) = params.name {
            assignments.push("name = ").push_bind_unseparated(name);
        }
        if let Some(email) = params.email {
            assignments.push("email = ").push_bind_unseparated(email);
        }
        if let Some(bio) = params.bio {
            assignments.push("bio = ").push_bind_unseparated(bio);
        }
        if let Some(birth_date) = params.birth_date {
            assignments
                .push("birth_date = ")
                .push_bind_unseparated(birth_date);
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

    async fn delete_author(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_books_for_author(&self, author_id: i64) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books WHERE author_id = $1 ORDER BY id",
            super::books::BOOK_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn author_exists(&self, id: i64) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn author_email_taken(
        &self,
        email: &str,
        ignore_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM authors \
                WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2) \
             )",
        )
        .bind(email)
        .bind(ignore_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }
}
