//! Poison-tolerant access to the cache map.
//!
//! A panic while holding the lock leaves the map in a usable state (every
//! write is a single insert or remove), so a poisoned lock is recovered.

use std::sync::{LockResult, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

pub(super) fn read<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockReadGuard<'a, T> {
    recover(lock.read(), "read", op)
}

pub(super) fn write<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockWriteGuard<'a, T> {
    recover(lock.write(), "write", op)
}

fn recover<G>(result: LockResult<G>, mode: &'static str, op: &'static str) -> G {
    result.unwrap_or_else(|poisoned| {
        warn!(
            target = "bookshelf::cache",
            op,
            mode,
            "Recovered from poisoned cache lock"
        );
        poisoned.into_inner()
    })
}
