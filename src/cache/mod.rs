//! Expiring in-process cache used for the full book listing.
//!
//! The cache is injected into the repositories through [`ExpiringCache`], so
//! callers can swap the in-memory store for [`DisabledCache`] (or a test double)
//! without touching process-wide state.
//!
//! ```toml
//! [cache]
//! enabled = true
//! book_list_ttl_seconds = 60
//! ```

mod config;
mod lock;
mod store;

pub use config::CacheConfig;
pub use store::{DisabledCache, ExpiringCache, MemoryCache};
