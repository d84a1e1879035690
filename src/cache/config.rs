//! Cache configuration.

use std::sync::Arc;
use std::time::Duration;

use super::store::{DisabledCache, ExpiringCache, MemoryCache};

const DEFAULT_BOOK_LIST_TTL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// When false every listing goes to the store.
    pub enabled: bool,
    /// How long the full book listing stays cached.
    pub book_list_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            book_list_ttl: Duration::from_secs(DEFAULT_BOOK_LIST_TTL_SECS),
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            book_list_ttl: settings.book_list_ttl,
        }
    }
}

impl CacheConfig {
    /// Build the cache backend matching this configuration.
    pub fn build<V>(&self) -> Arc<dyn ExpiringCache<V>>
    where
        V: Clone + Send + Sync + 'static,
    {
        if self.enabled {
            Arc::new(MemoryCache::new())
        } else {
            Arc::new(DisabledCache)
        }
    }
}
