//! Cachette - a bounded in-memory key/value cache
//!
//! Provides TTL expiration, oldest-write eviction, hit/miss accounting,
//! and cache-aside helpers that coordinate lookups with async producer
//! functions.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, CacheStore, EntryMetadata, Memoized, SetItem, Snapshot};
pub use config::{CacheConfig, CacheConfigUpdate};
pub use error::{CacheError, FetchError};
pub use tasks::spawn_cleanup_task;
