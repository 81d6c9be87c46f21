//! Request-deduplicating async cache
//!
//! Wraps the TTL cache with a map of in-flight fetches keyed like the
//! cache. At most one factory runs per key at a time: concurrent callers
//! for the same key all await one shared future and receive clones of its
//! result. The in-flight entry is removed exactly once when the factory
//! settles; failures are never stored, so the next caller after a failure
//! fetches fresh.

use crate::cache::lru::TtlCache;
use crate::{Result as ScrapeResult, ScrapeError};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Result type shared between concurrent callers of one fetch
///
/// The error is wrapped in `Arc` so every waiter can receive it.
pub type SharedResult<V> = std::result::Result<V, Arc<ScrapeError>>;

type InFlight<V> = Shared<BoxFuture<'static, SharedResult<V>>>;

/// An LRU/TTL cache that collapses concurrent identical fetches
pub struct AsyncCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    entries: Arc<Mutex<TtlCache<K, V>>>,
    pending: Arc<Mutex<HashMap<K, InFlight<V>>>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<K, V> AsyncCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(TtlCache::new(max_size, default_ttl))),
            pending: Arc::new(Mutex::new(HashMap::new())),
            sweeper: Mutex::new(None),
        }
    }

    /// Returns the cached value for `key`, or fetches it via `factory`
    ///
    /// - live cached value: returned immediately, factory not called
    /// - fetch already in flight for this key: awaits it, sharing the result
    /// - otherwise: runs the factory; a success is stored with `ttl` (cache
    ///   default when `None`), a failure is returned to every waiter and
    ///   nothing is stored
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: K,
        ttl: Option<Duration>,
        factory: F,
    ) -> SharedResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ScrapeResult<V>> + Send + 'static,
    {
        if let Some(value) = self.entries.lock().unwrap().get(&key) {
            return Ok(value);
        }

        let in_flight = {
            let mut pending = self.pending.lock().unwrap();

            if let Some(existing) = pending.get(&key) {
                existing.clone()
            } else {
                let entries = Arc::clone(&self.entries);
                let pending_map = Arc::clone(&self.pending);
                let owned_key = key.clone();
                let fetch = factory();

                let shared: InFlight<V> = async move {
                    let result = fetch.await.map_err(Arc::new);
                    if let Ok(value) = &result {
                        entries
                            .lock()
                            .unwrap()
                            .put(owned_key.clone(), value.clone(), ttl);
                    }
                    // Settled, success or failure: the in-flight slot goes away
                    pending_map.lock().unwrap().remove(&owned_key);
                    result
                }
                .boxed()
                .shared();

                pending.insert(key.clone(), shared.clone());
                shared
            }
        };

        in_flight.await
    }

    /// Drops the cached value for `key`, if any
    pub fn invalidate(&self, key: &K) {
        self.entries.lock().unwrap().remove(key);
    }

    /// Spawns a background task that sweeps expired entries periodically
    ///
    /// Must run inside a tokio runtime. Calling it again replaces the
    /// previous sweeper.
    pub fn start_sweeper(&self, every: Duration) {
        let entries = Arc::clone(&self.entries);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await; // the first tick completes immediately
            loop {
                ticker.tick().await;
                entries.lock().unwrap().sweep();
            }
        });

        if let Some(previous) = self.sweeper.lock().unwrap().replace(handle) {
            previous.abort();
        }
    }

    /// Stops the sweeper and clears both the cache and the in-flight map
    pub fn shutdown(&self) {
        if let Some(handle) = self.sweeper.lock().unwrap().take() {
            handle.abort();
        }
        self.entries.lock().unwrap().clear();
        self.pending.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl<K, V> Drop for AsyncCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        // The sweeper must not outlive the cache it sweeps
        if let Ok(mut guard) = self.sweeper.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}
