//! In-memory result cache with per-lookup TTL.

use crate::clock::Clock;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheStatus::Hit)
    }
}

/// A value together with where it came from.
#[derive(Debug, Clone)]
pub struct Lookup<V> {
    pub value: V,
    pub status: CacheStatus,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    created_at: Instant,
    last_access: Instant,
}

/// Key/value cache where each entry is served while its age is at most the
/// TTL given at lookup time.
///
/// Expired entries are dropped lazily, the next time their key is looked up.
/// With a capacity bound, inserting into a full cache evicts the least
/// recently used entry.
#[derive(Debug)]
pub struct TimedCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    clock: Arc<dyn Clock>,
    max_entries: Option<usize>,
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            max_entries: None,
        }
    }

    pub fn with_max_entries(mut self, max_entries: Option<usize>) -> Self {
        self.max_entries = max_entries.filter(|n| *n > 0);
        self
    }

    /// Fresh value for `key`, evicting it if it has outlived `ttl`.
    pub async fn get(&self, key: &K, ttl: Duration) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        let expired = match entries.get_mut(key) {
            None => return None,
            Some(entry) if now.saturating_duration_since(entry.created_at) <= ttl => {
                entry.last_access = now;
                return Some(entry.value.clone());
            }
            Some(_) => true,
        };

        if expired {
            entries.remove(key);
            debug!(target: "cache", key = ?key, "Evicted expired entry");
        }
        None
    }

    /// Store `value` stamped with the current time, replacing any previous entry.
    pub async fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        if let Some(limit) = self.max_entries {
            if !entries.contains_key(&key) && entries.len() >= limit {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_access)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                    debug!(
                        target: "cache",
                        key = ?oldest,
                        limit,
                        "Evicted least recently used entry"
                    );
                }
            }
        }

        entries.insert(
            key,
            Entry {
                value,
                created_at: now,
                last_access: now,
            },
        );
    }

    /// Return the cached value or run `compute` and cache its result.
    ///
    /// `compute` runs without holding the cache lock. Errors are returned
    /// as-is and leave the cache untouched.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: K,
        ttl: Duration,
        compute: F,
    ) -> Result<Lookup<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key, ttl).await {
            return Ok(Lookup {
                value,
                status: CacheStatus::Hit,
            });
        }

        let value = compute().await?;
        self.insert(key, value.clone()).await;
        Ok(Lookup {
            value,
            status: CacheStatus::Miss,
        })
    }

    pub async fn invalidate(&self, key: &K) -> bool {
        self.entries.lock().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of stored entries, including expired ones not yet looked up.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Age of the entry for `key`, if one is stored.
    pub async fn age(&self, key: &K) -> Option<Duration> {
        let now = self.clock.now();
        self.entries
            .lock()
            .await
            .get(key)
            .map(|entry| now.saturating_duration_since(entry.created_at))
    }
}
