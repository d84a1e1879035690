//! Cache storage implementations.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use tokio::time::Instant;

use super::lock;

/// Key/value cache whose entries expire a fixed time after they were stored.
pub trait ExpiringCache<V>: Send + Sync {
    /// Returns the stored value unless it is missing or expired.
    fn get(&self, key: &str) -> Option<V>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn put(&self, key: &str, value: V, ttl: Duration);
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory [`ExpiringCache`].
///
/// Concurrent fills after expiry are not coordinated: the last writer wins.
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
}

impl<V> MemoryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ExpiringCache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        let entries = lock::read(&self.entries, "get");
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    fn put(&self, key: &str, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        lock::write(&self.entries, "put").insert(key.to_string(), Entry { value, expires_at });
    }
}

/// A cache that never holds anything; every read is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCache;

impl<V> ExpiringCache<V> for DisabledCache {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn put(&self, _key: &str, _value: V, _ttl: Duration) {}
}
