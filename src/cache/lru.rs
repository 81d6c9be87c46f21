//! Bounded TTL cache
//!
//! An LRU map whose entries carry an expiry deadline. Expired entries are
//! treated as absent: a `get` that lands on one removes it and misses. Live
//! hits are promoted to most-recently-used; inserts at capacity evict from
//! the least-recently-used end.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// A cached value together with its expiry deadline
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
}

/// Bounded, insertion-ordered cache with per-entry TTLs
pub struct TtlCache<K: Hash + Eq + Clone, V: Clone> {
    entries: LruCache<K, CacheEntry<V>>,
    default_ttl: Duration,
}

impl<K: Hash + Eq + Clone, V: Clone> TtlCache<K, V> {
    /// Creates a cache holding at most `max_size` entries
    ///
    /// A zero `max_size` is treated as one; a cache that can hold nothing
    /// is never useful.
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            default_ttl,
        }
    }

    /// Looks up a live entry, promoting it to most-recently-used
    ///
    /// An entry past its deadline is removed and reported as a miss.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let expired = match self.entries.peek(key) {
            Some(entry) => entry.expires_at <= Instant::now(),
            None => return None,
        };

        if expired {
            self.entries.pop(key);
            return None;
        }

        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Inserts a value, evicting from the least-recently-used end if full
    ///
    /// Re-inserting an existing key replaces its value and resets its
    /// recency. `ttl` falls back to the cache default.
    pub fn put(&mut self, key: K, value: V, ttl: Option<Duration>) {
        let expires_at = Instant::now() + ttl.unwrap_or(self.default_ttl);
        self.entries.put(key, CacheEntry { value, expires_at });
    }

    /// Removes an entry, returning its value if it was present and live
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.entries.pop(key)?;
        (entry.expires_at > Instant::now()).then_some(entry.value)
    }

    /// Drops every expired entry
    pub fn sweep(&mut self) {
        let now = Instant::now();
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.pop(key);
        }

        if !expired.is_empty() {
            tracing::debug!("Swept {} expired cache entries", expired.len());
        }
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
