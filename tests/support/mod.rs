#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use time::{Date, OffsetDateTime};
use tower::ServiceExt;

use bookshelf::application::authors::AuthorRepository;
use bookshelf::application::books::{BookListCache, BookRepository};
use bookshelf::application::repos::{
    AuthorStore, BookStore, CreateAuthorParams, CreateBookParams, StoreError, StoreHealth,
    UpdateAuthorParams, UpdateBookParams,
};
use bookshelf::cache::MemoryCache;
use bookshelf::domain::entities::{Author, Book};
use bookshelf::infra::http::{ApiState, build_router};

pub const MAX_PER_PAGE: u32 = 100;
pub const BOOK_LIST_TTL: Duration = Duration::from_secs(60);

#[derive(Default)]
struct Tables {
    next_author_id: i64,
    next_book_id: i64,
    authors: BTreeMap<i64, Author>,
    books: BTreeMap<i64, Book>,
}

/// Store double with the same observable rules as the Postgres schema:
/// ids in insertion order, unique author emails, cascading author deletes.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
    list_books_calls: AtomicUsize,
    author_creates: AtomicUsize,
    book_creates: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every following call fails with a persistence error.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn list_books_calls(&self) -> usize {
        self.list_books_calls.load(Ordering::SeqCst)
    }

    pub fn author_creates(&self) -> usize {
        self.author_creates.load(Ordering::SeqCst)
    }

    pub fn book_creates(&self) -> usize {
        self.book_creates.load(Ordering::SeqCst)
    }

    pub fn book_count(&self) -> usize {
        self.tables().books.len()
    }

    pub async fn insert_author(&self, name: &str) -> Author {
        self.create_author(CreateAuthorParams {
            name: name.to_string(),
            email: None,
            bio: None,
            birth_date: None,
        })
        .await
        .expect("insert author")
    }

    pub async fn insert_book(&self, author_id: i64, title: &str) -> Book {
        self.create_book(CreateBookParams {
            title: title.to_string(),
            author_id,
            description: Some(format!("About {title}")),
            publish_date: None,
        })
        .await
        .expect("insert book")
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("store lock")
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::from_persistence("connection refused"))
        } else {
            Ok(())
        }
    }
}

fn books_sorted(books: impl Iterator<Item = Book>) -> Vec<Book> {
    let mut books: Vec<Book> = books.collect();
    books.sort_by_key(|book| book.id);
    books
}

#[async_trait]
impl AuthorStore for InMemoryStore {
    async fn list_authors(&self) -> Result<Vec<Author>, StoreError> {
        self.check()?;
        Ok(self.tables().authors.values().cloned().collect())
    }

    async fn find_author(&self, id: i64) -> Result<Option<Author>, StoreError> {
        self.check()?;
        Ok(self.tables().authors.get(&id).cloned())
    }

    async fn create_author(&self, params: CreateAuthorParams) -> Result<Author, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        if let Some(email) = params.email.as_deref() {
            if tables
                .authors
                .values()
                .any(|author| author.email.as_deref() == Some(email))
            {
                return Err(StoreError::Duplicate {
                    constraint: "authors_email_unique".to_string(),
                });
            }
        }

        tables.next_author_id += 1;
        let now = OffsetDateTime::now_utc();
        let author = Author {
            id: tables.next_author_id,
            name: params.name,
            email: params.email,
            bio: params.bio,
            birth_date: params.birth_date,
            created_at: now,
            updated_at: now,
        };
        tables.authors.insert(author.id, author.clone());
        self.author_creates.fetch_add(1, Ordering::SeqCst);
        Ok(author)
    }

    async fn update_author(
        &self,
        id: i64,
        params: UpdateAuthorParams,
    ) -> Result<bool, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        let Some(author) = tables.authors.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(name) = params.name {
            author.name = name;
        }
        if let Some(email) = params.email {
            author.email = Some(email);
        }
        if let Some(bio) = params.bio {
            author.bio = bio;
        }
        if let Some(birth_date) = params.birth_date {
            author.birth_date = birth_date;
        }
        author.updated_at = OffsetDateTime::now_utc();
        Ok(true)
    }

    async fn delete_author(&self, id: i64) -> Result<bool, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        if tables.authors.remove(&id).is_none() {
            return Ok(false);
        }
        tables.books.retain(|_, book| book.author_id != id);
        Ok(true)
    }

    async fn list_books_for_author(&self, author_id: i64) -> Result<Vec<Book>, StoreError> {
        self.check()?;
        let tables = self.tables();
        Ok(books_sorted(
            tables
                .books
                .values()
                .filter(|book| book.author_id == author_id)
                .cloned(),
        ))
    }

    async fn author_exists(&self, id: i64) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.tables().authors.contains_key(&id))
    }

    async fn author_email_taken(
        &self,
        email: &str,
        ignore_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.tables().authors.values().any(|author| {
            author.email.as_deref() == Some(email) && Some(author.id) != ignore_id
        }))
    }
}

#[async_trait]
impl BookStore for InMemoryStore {
    async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        self.check()?;
        self.list_books_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tables().books.values().cloned().collect())
    }

    async fn list_books_page(&self, limit: u64, offset: u64) -> Result<Vec<Book>, StoreError> {
        self.check()?;
        Ok(self
            .tables()
            .books
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_books(&self) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self.tables().books.len() as u64)
    }

    async fn find_book(&self, id: i64) -> Result<Option<Book>, StoreError> {
        self.check()?;
        Ok(self.tables().books.get(&id).cloned())
    }

    async fn create_book(&self, params: CreateBookParams) -> Result<Book, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        if !tables.authors.contains_key(&params.author_id) {
            return Err(StoreError::InvalidInput {
                message: "violates foreign key constraint \"books_author_id_foreign\"".to_string(),
            });
        }

        tables.next_book_id += 1;
        let now = OffsetDateTime::now_utc();
        let book = Book {
            id: tables.next_book_id,
            title: params.title,
            description: params.description,
            publish_date: params.publish_date,
            author_id: params.author_id,
            created_at: now,
            updated_at: now,
        };
        tables.books.insert(book.id, book.clone());
        self.book_creates.fetch_add(1, Ordering::SeqCst);
        Ok(book)
    }

    async fn update_book(&self, id: i64, params: UpdateBookParams) -> Result<bool, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        let Some(book) = tables.books.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(title) = params.title {
            book.title = title;
        }
        if let Some(author_id) = params.author_id {
            book.author_id = author_id;
        }
        if let Some(description) = params.description {
            book.description = description;
        }
        if let Some(publish_date) = params.publish_date {
            book.publish_date = publish_date;
        }
        book.updated_at = OffsetDateTime::now_utc();
        Ok(true)
    }

    async fn delete_book(&self, id: i64) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.tables().books.remove(&id).is_some())
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

/// Router over `store` with an in-memory book listing cache.
pub fn app(store: Arc<InMemoryStore>) -> Router {
    app_with_cache(store, Arc::new(MemoryCache::new()))
}

pub fn app_with_cache(store: Arc<InMemoryStore>, cache: Arc<BookListCache>) -> Router {
    let books = BookRepository::new(store.clone(), cache).with_cache_ttl(BOOK_LIST_TTL);
    build_router(ApiState {
        authors: Arc::new(AuthorRepository::new(store.clone())),
        books: Arc::new(books),
        health: store,
        max_per_page: MAX_PER_PAGE,
    })
}

pub fn date(value: &str) -> Date {
    bookshelf::domain::dates::parse_iso_date(value).expect("valid date")
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, empty_request(Method::GET, uri)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, empty_request(Method::DELETE, uri)).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, json_request(Method::POST, uri, body.to_string())).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, json_request(Method::PUT, uri, body.to_string())).await
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

pub fn json_request(method: Method, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request should build")
}
