//! Book repository: store access, offset pagination and the cached full listing.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::debug;

use crate::application::error::{RepositoryError, operation_failed};
use crate::application::pagination::{DEFAULT_PER_PAGE, LengthAwarePage, PageRequest};
use crate::application::repos::{BookStore, CreateBookParams, UpdateBookParams};
use crate::cache::{CacheConfig, ExpiringCache};
use crate::domain::entities::Book;
use crate::infra::telemetry::{BOOK_CACHE_HIT_TOTAL, BOOK_CACHE_MISS_TOTAL};

/// Fixed key under which the unpaginated listing is cached.
pub const ALL_BOOKS_CACHE_KEY: &str = "books.all";

pub type BookListCache = dyn ExpiringCache<Arc<Vec<Book>>>;

/// Result of [`BookRepository::list_all`].
#[derive(Debug, Clone)]
pub enum BookListing {
    Page(LengthAwarePage<Book>),
    All(Arc<Vec<Book>>),
}

impl BookListing {
    pub fn is_empty(&self) -> bool {
        match self {
            BookListing::Page(page) => page.is_empty(),
            BookListing::All(books) => books.is_empty(),
        }
    }
}

#[derive(Clone)]
pub struct BookRepository {
    store: Arc<dyn BookStore>,
    cache: Arc<BookListCache>,
    cache_ttl: Duration,
    default_per_page: u32,
}

impl BookRepository {
    pub fn new(store: Arc<dyn BookStore>, cache: Arc<BookListCache>) -> Self {
        Self {
            store,
            cache,
            cache_ttl: CacheConfig::default().book_list_ttl,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_default_per_page(mut self, per_page: u32) -> Self {
        self.default_per_page = per_page.max(1);
        self
    }

    /// Lists books in one of two modes.
    ///
    /// With a `page`, returns that page (`per_page` defaults to the configured
    /// page size) along with the collection size. Without one, returns the full
    /// listing from the cache, reading the store only on a miss; a cached
    /// snapshot may be up to one TTL stale.
    pub async fn list_all(
        &self,
        per_page: Option<u32>,
        page: Option<u32>,
    ) -> Result<BookListing, RepositoryError> {
        match page {
            Some(page) => {
                let request = PageRequest::new(per_page.unwrap_or(self.default_per_page), page);
                self.page(request).await.map(BookListing::Page)
            }
            None => self.all_cached().await.map(BookListing::All),
        }
    }

    async fn page(&self, request: PageRequest) -> Result<LengthAwarePage<Book>, RepositoryError> {
        let action = "retrieve all books";
        let total = self
            .store
            .count_books()
            .await
            .map_err(operation_failed(action))?;
        let data = self
            .store
            .list_books_page(request.limit(), request.offset())
            .await
            .map_err(operation_failed(action))?;

        Ok(LengthAwarePage::new(data, total, request))
    }

    async fn all_cached(&self) -> Result<Arc<Vec<Book>>, RepositoryError> {
        if let Some(books) = self.cache.get(ALL_BOOKS_CACHE_KEY) {
            counter!(BOOK_CACHE_HIT_TOTAL).increment(1);
            return Ok(books);
        }
        counter!(BOOK_CACHE_MISS_TOTAL).increment(1);

        let books = Arc::new(
            self.store
                .list_books()
                .await
                .map_err(operation_failed("retrieve all books"))?,
        );
        self.cache
            .put(ALL_BOOKS_CACHE_KEY, Arc::clone(&books), self.cache_ttl);
        debug!(
            target = "bookshelf::cache",
            key = ALL_BOOKS_CACHE_KEY,
            count = books.len(),
            ttl_secs = self.cache_ttl.as_secs(),
            "book listing cached"
        );

        Ok(books)
    }

    /// `Ok(None)` when the book does not exist.
    pub async fn find(&self, id: i64) -> Result<Option<Book>, RepositoryError> {
        self.store
            .find_book(id)
            .await
            .map_err(operation_failed("retrieve the book"))
    }

    pub async fn create(&self, params: CreateBookParams) -> Result<Book, RepositoryError> {
        self.store
            .create_book(params)
            .await
            .map_err(operation_failed("create a new book"))
    }

    /// Applies only the supplied fields. `Ok(false)` when the book does not exist.
    pub async fn update(&self, id: i64, params: UpdateBookParams) -> Result<bool, RepositoryError> {
        self.store
            .update_book(id, params)
            .await
            .map_err(operation_failed("update the book"))
    }

    /// `Ok(false)` when the book does not exist.
    pub async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        self.store
            .delete_book(id)
            .await
            .map_err(operation_failed("delete the book"))
    }
}
