//! Cache Handle Module
//!
//! Shared async engine handle: wraps the synchronous store behind a
//! read-write lock, owns the background sweep task, and provides the
//! cache-aside helpers.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::store::validate_key;
use crate::cache::{CacheStats, CacheStore, EntryMetadata, SetItem, Snapshot};
use crate::config::{CacheConfig, CacheConfigUpdate};
use crate::error::{CacheError, FetchError};
use crate::tasks::spawn_cleanup_task;

// == Sweep Guard ==
/// Owns the sweep task handle and aborts it when the last clone drops, so a
/// discarded engine never leaves a ticking task behind.
#[derive(Debug)]
struct SweepGuard {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SweepGuard {
    fn new(handle: JoinHandle<()>) -> Self {
        Self {
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Aborts the current sweep task, if any. No further ticks run.
    fn stop(&self) {
        if let Ok(mut slot) = self.handle.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }

    /// Replaces the sweep task, aborting the old one.
    fn restart(&self, new_handle: JoinHandle<()>) {
        if let Ok(mut slot) = self.handle.lock() {
            if let Some(old) = slot.replace(new_handle) {
                old.abort();
            }
        }
    }
}

impl Drop for SweepGuard {
    fn drop(&mut self) {
        self.stop();
    }
}

// == Cache Handle ==
/// Shared, concurrency-safe cache engine.
///
/// Cloning is cheap and every clone operates on the same store.
/// Constructing a handle spawns the background sweep, so a Tokio runtime
/// must be running. Call [`Cache::shutdown`] to stop the sweep and release
/// all entries; dropping the last clone also cancels the sweep.
///
/// Prefer passing a handle around explicitly over stashing one in a
/// global: lifetimes stay visible and tests stay isolated.
pub struct Cache<V> {
    /// Shared entry table
    store: Arc<RwLock<CacheStore<V>>>,
    /// Background sweep task, restarted when the interval changes
    sweeper: Arc<SweepGuard>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sweeper: Arc::clone(&self.sweeper),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> Cache<V> {
    // == Constructor ==
    /// Creates a cache engine and starts its background sweep.
    pub fn new(config: CacheConfig) -> Self {
        let cleanup_interval = config.cleanup_interval;
        let store = Arc::new(RwLock::new(CacheStore::new(config)));
        let sweeper = spawn_cleanup_task(Arc::clone(&store), cleanup_interval);

        Self {
            store,
            sweeper: Arc::new(SweepGuard::new(sweeper)),
        }
    }

    // == Core Operations ==
    /// Retrieves a value by key. See [`CacheStore::get`].
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.write().await.get(key)
    }

    /// Stores a key-value pair with optional TTL. See [`CacheStore::set`].
    pub async fn set(
        &self,
        key: impl Into<String>,
        value: V,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        self.store.write().await.set(key.into(), value, ttl)
    }

    /// Checks unexpired presence. See [`CacheStore::has`].
    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    /// Removes an entry, returning whether something was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    /// Removes all entries and resets the counters.
    pub async fn clear(&self) {
        self.store.write().await.clear()
    }

    /// Returns current statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Fraction of lookups served from the cache.
    pub async fn hit_rate(&self) -> f64 {
        self.store.read().await.hit_rate()
    }

    /// Introspects an entry's timing. See [`CacheStore::metadata`].
    pub async fn metadata(&self, key: &str) -> Option<EntryMetadata> {
        self.store.write().await.metadata(key)
    }

    // == Batch Operations ==
    /// Applies `set` per item, best-effort. See [`CacheStore::set_many`].
    pub async fn set_many(&self, items: Vec<SetItem<V>>) -> Vec<Result<(), CacheError>> {
        self.store.write().await.set_many(items)
    }

    /// Applies `get` per key. See [`CacheStore::get_many`].
    pub async fn get_many(&self, keys: &[String]) -> HashMap<String, Option<V>> {
        self.store.write().await.get_many(keys)
    }

    /// Applies `delete` per key, returning the number removed.
    pub async fn delete_many(&self, keys: &[String]) -> usize {
        self.store.write().await.delete_many(keys)
    }

    // == Snapshots ==
    /// Snapshots all unexpired entries. See [`CacheStore::export`].
    pub async fn export(&self) -> Snapshot<V> {
        self.store.read().await.export()
    }

    /// Merges a snapshot into the store. See [`CacheStore::import`].
    pub async fn import(&self, snapshot: Snapshot<V>) -> usize {
        self.store.write().await.import(snapshot)
    }

    // == Cache-Aside ==
    /// Returns the cached value for `key`, or produces, stores, and
    /// returns it on a miss.
    ///
    /// The producer runs without the store lock held: only the initial
    /// lookup and the final write-back are locked. Concurrent callers
    /// missing on the same key may therefore each invoke the producer, and
    /// the last write-back wins; there is no single-flight deduplication.
    /// A producer failure is propagated unchanged and nothing is cached.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        producer: F,
        ttl: Option<Duration>,
    ) -> Result<V, FetchError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        validate_key(key)?;

        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let value = producer().await.map_err(FetchError::Producer)?;
        self.set(key, value.clone(), ttl).await?;
        Ok(value)
    }

    /// Alias of [`Cache::get_or_fetch`]; both names describe the same
    /// cache-aside contract and behave identically.
    pub async fn prefetch<F, Fut, E>(
        &self,
        key: &str,
        producer: F,
        ttl: Option<Duration>,
    ) -> Result<V, FetchError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.get_or_fetch(key, producer, ttl).await
    }

    // == Update Config ==
    /// Merges partial configuration into the live configuration.
    ///
    /// A changed `cleanup_interval` restarts the background sweep with the
    /// new period. A smaller `max_entries` is a lazy shrink, applied on
    /// the next insert.
    pub async fn update_config(&self, update: CacheConfigUpdate) {
        let new_interval = update.cleanup_interval;
        self.store.write().await.update_config(update);

        if let Some(interval) = new_interval {
            self.sweeper
                .restart(spawn_cleanup_task(Arc::clone(&self.store), interval));
            info!("Sweep interval changed to {:?}, background sweep restarted", interval);
        }
    }

    /// Returns a copy of the live configuration.
    pub async fn config(&self) -> CacheConfig {
        self.store.read().await.config().clone()
    }

    // == Shutdown ==
    /// Stops the background sweep and releases all entries.
    ///
    /// No sweep ticks run after this returns. The handle stays usable for
    /// direct operations, but expired entries are then only reclaimed
    /// lazily on access.
    pub async fn shutdown(&self) {
        self.sweeper.stop();
        self.store.write().await.clear();
        info!("Cache engine shut down");
    }
}
