use anyhow::Result;
use dashmap::DashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// One cached value with its creation time and time-to-live.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    created_at: Instant,
    ttl: Duration,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self) -> bool {
        self.created_at.elapsed() < self.ttl
    }
}

/// Time-bound memoization keyed by string.
///
/// Entries expire lazily on read; the only other way out is `clear()`.
/// The key space is a handful of structural keys, so there is no
/// capacity bound or eviction beyond TTL.
pub struct MenuCache<T: Clone> {
    storage: DashMap<String, CacheEntry<T>>,

    /// Serializes the compute path so concurrent misses for the same TTL
    /// window recompute at most once.
    compute_gate: Mutex<()>,
}

impl<T: Clone> MenuCache<T> {
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            compute_gate: Mutex::new(()),
        }
    }

    /// Return the cached value for `key` if still fresh; otherwise run
    /// `compute`, store the result with a fresh timestamp, and return it.
    ///
    /// A failing `compute` writes nothing, so a transient error never
    /// poisons the cache.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.fresh_value(key) {
            debug!("Cache hit for '{}'", key);
            return Ok(value);
        }

        let _gate = self.compute_gate.lock().await;

        // Another task may have populated the entry while we waited.
        if let Some(value) = self.fresh_value(key) {
            debug!("Cache populated while waiting for '{}'", key);
            return Ok(value);
        }

        debug!("Cache miss for '{}', computing", key);
        let value = compute().await?;

        self.storage.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                created_at: Instant::now(),
                ttl,
            },
        );

        Ok(value)
    }

    /// Fresh value for `key`, removing the entry if it has expired.
    fn fresh_value(&self, key: &str) -> Option<T> {
        let entry = self.storage.get(key)?;
        if entry.is_fresh() {
            return Some(entry.value.clone());
        }

        drop(entry); // Release read lock before removing
        self.storage.remove(key);
        debug!("Cache entry '{}' expired, removed", key);
        None
    }

    /// Drop all entries unconditionally. Test/ops hook only.
    pub fn clear(&self) {
        self.storage.clear();
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl<T: Clone> Default for MenuCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
