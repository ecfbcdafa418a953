//! Cache Module
//!
//! Provides the bounded in-memory cache engine: TTL expiration,
//! oldest-write eviction, hit/miss accounting, cache-aside helpers, and
//! structural snapshots.

mod entry;
mod handle;
mod memo;
mod snapshot;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, EntryMetadata};
pub use handle::Cache;
pub use memo::Memoized;
pub use snapshot::{JsonSnapshot, Snapshot, SnapshotEntry};
pub use stats::CacheStats;
pub use store::{CacheStore, SetItem, MIN_TTL};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
