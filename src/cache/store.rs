//! Cache Store Module
//!
//! The synchronous cache engine: a bounded HashMap with per-entry TTL
//! expiration, oldest-write eviction, and hit/miss accounting.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::cache::{
    CacheEntry, CacheStats, EntryMetadata, Snapshot, SnapshotEntry, MAX_KEY_LENGTH,
};
use crate::config::{CacheConfig, CacheConfigUpdate};
use crate::error::{CacheError, Result};

// == Minimum TTL ==
/// Lower bound applied to TTLs.
///
/// A zero TTL is clamped to this value rather than treated as "never
/// expires": the entry lives for one millisecond and then behaves like any
/// other expired entry.
pub const MIN_TTL: Duration = Duration::from_millis(1);

// == Key Validation ==
/// Rejects structurally invalid keys on write paths.
///
/// Read paths need no validation: an invalid key can never have been
/// stored, so lookups on one are ordinary misses.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::EmptyKey);
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::KeyTooLong {
            len: key.len(),
            max: MAX_KEY_LENGTH,
        });
    }
    Ok(())
}

// == Set Item ==
/// One item of a `set_many` batch.
#[derive(Debug, Clone)]
pub struct SetItem<V> {
    /// The key to store under
    pub key: String,
    /// The value to store
    pub value: V,
    /// Optional TTL override
    pub ttl: Option<Duration>,
}

// == Cache Store ==
/// Bounded key-value store with TTL expiration and oldest-write eviction.
///
/// This is the single-owner synchronous engine; [`Cache`](crate::Cache)
/// wraps it behind a lock for shared async access. Values are opaque: the
/// engine clones them out on reads and never inspects their contents.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Live configuration
    config: CacheConfig,
    /// Next insertion sequence number
    next_seq: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            config,
            next_seq: 0,
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// If the key already exists the value is overwritten and the entry's
    /// timestamps are reset. If the cache is at capacity and the key is
    /// new, entries with the oldest write time are evicted until the new
    /// entry fits.
    ///
    /// The TTL defaults to the configured `default_ttl`; explicit TTLs are
    /// clamped to at least [`MIN_TTL`], so a zero TTL expires almost
    /// immediately instead of living forever.
    pub fn set(&mut self, key: String, value: V, ttl: Option<Duration>) -> Result<()> {
        validate_key(&key)?;

        // Evict before insert: the capacity bound holds after every
        // mutation, never by removing entries after the fact.
        if !self.entries.contains_key(&key) {
            self.make_room();
        }

        let effective_ttl = ttl.unwrap_or(self.config.default_ttl).max(MIN_TTL);
        let entry = CacheEntry::new(value, effective_ttl, self.bump_seq());
        self.entries.insert(key, entry);
        self.stats.set_size(self.entries.len());
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value and counts a hit if the entry is present and
    /// unexpired. Absent and expired keys count a miss, and expired entries
    /// are removed on the spot. Reads never refresh an entry's TTL and
    /// never protect it from eviction.
    pub fn get(&mut self, key: &str) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                self.stats.set_size(self.entries.len());
                self.stats.record_miss();
                return None;
            }

            let value = entry.value.clone();
            self.stats.record_hit();
            Some(value)
        } else {
            self.stats.record_miss();
            None
        }
    }

    // == Has ==
    /// Checks unexpired presence without touching the hit/miss counters.
    ///
    /// Expired entries are removed as a side effect, same as `get`.
    pub fn has(&mut self, key: &str) -> bool {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                self.stats.set_size(self.entries.len());
                return false;
            }
            true
        } else {
            false
        }
    }

    // == Delete ==
    /// Removes an entry unconditionally.
    ///
    /// Returns whether something was removed. Never touches the hit/miss
    /// counters.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.set_size(self.entries.len());
        }
        removed
    }

    // == Clear ==
    /// Removes all entries and resets every counter to zero.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::new();
    }

    // == Metadata ==
    /// Introspects an entry's timing without affecting statistics.
    ///
    /// Lazy expiry still applies: an expired entry reports absent and is
    /// removed.
    pub fn metadata(&mut self, key: &str) -> Option<EntryMetadata> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                self.stats.set_size(self.entries.len());
                return None;
            }
            Some(EntryMetadata {
                created_at: entry.created_at,
                expires_at: entry.expires_at,
                remaining_ttl: entry.remaining_ttl(),
            })
        } else {
            None
        }
    }

    // == Batch Operations ==
    /// Applies `set` for each item in order.
    ///
    /// A failing item never prevents later items from being processed; the
    /// per-item results are returned to the caller in input order.
    pub fn set_many(&mut self, items: Vec<SetItem<V>>) -> Vec<Result<()>> {
        items
            .into_iter()
            .map(|item| self.set(item.key, item.value, item.ttl))
            .collect()
    }

    /// Applies `get` per key; each lookup counts hits and misses
    /// independently.
    pub fn get_many(&mut self, keys: &[String]) -> HashMap<String, Option<V>> {
        keys.iter()
            .map(|key| (key.clone(), self.get(key)))
            .collect()
    }

    /// Applies `delete` per key, returning how many entries were removed.
    pub fn delete_many(&mut self, keys: &[String]) -> usize {
        keys.iter().filter(|key| self.delete(key)).count()
    }

    // == Stats ==
    /// Returns current statistics.
    ///
    /// `size` is the physical entry count and may include expired entries
    /// that no sweep or lookup has removed yet.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    /// Fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f64 {
        self.stats.hit_rate()
    }

    // == Cleanup Expired ==
    /// Removes every expired entry.
    ///
    /// The eager half of the dual expiration scheme: entries nobody reads
    /// again are reclaimed here. Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before - self.entries.len();
        if removed > 0 {
            self.stats.set_size(self.entries.len());
        }
        removed
    }

    // == Export ==
    /// Snapshots all unexpired entries.
    ///
    /// Entries that have expired but not yet been swept are excluded.
    /// Timestamps are translated to the wall clock so the snapshot stays
    /// meaningful outside this process.
    pub fn export(&self) -> Snapshot<V> {
        let now = Instant::now();
        let wall_now = Utc::now();

        let entries = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, entry)| {
                let remaining = entry.expires_at.saturating_duration_since(now);
                let age = now.saturating_duration_since(entry.created_at);
                let snapshot_entry = SnapshotEntry {
                    value: entry.value.clone(),
                    created_at: wall_now - to_wall_delta(age),
                    expires_at: wall_now + to_wall_delta(remaining),
                    remaining_ttl: remaining,
                };
                (key.clone(), snapshot_entry)
            })
            .collect();

        Snapshot { entries }
    }

    // == Import ==
    /// Merges a snapshot into the store.
    ///
    /// Entries already expired at import time are silently skipped, as are
    /// entries with invalid keys. Surviving entries keep their original
    /// `created_at`/`expires_at`, translated back to the monotonic clock,
    /// instead of being reset to the import moment. The capacity bound
    /// applies through the normal evict-before-insert path.
    ///
    /// Returns the number of entries imported.
    pub fn import(&mut self, snapshot: Snapshot<V>) -> usize {
        let now = Instant::now();
        let wall_now = Utc::now();
        let mut imported = 0;

        for (key, snapshot_entry) in snapshot.entries {
            if validate_key(&key).is_err() {
                continue;
            }

            let remaining = match (snapshot_entry.expires_at - wall_now).to_std() {
                Ok(d) if d > Duration::ZERO => d,
                _ => continue,
            };
            let age = (wall_now - snapshot_entry.created_at)
                .to_std()
                .unwrap_or(Duration::ZERO);

            if !self.entries.contains_key(&key) {
                self.make_room();
            }

            // An age reaching back before this process started cannot be
            // represented on the monotonic clock; clamp to now.
            let created_at = now.checked_sub(age).unwrap_or(now);
            let entry =
                CacheEntry::from_parts(snapshot_entry.value, created_at, now + remaining, self.bump_seq());
            self.entries.insert(key, entry);
            imported += 1;
        }

        self.stats.set_size(self.entries.len());
        imported
    }

    // == Update Config ==
    /// Merges partial configuration into the live configuration.
    ///
    /// A smaller `max_entries` is a lazy shrink: nothing is evicted until
    /// the next insert.
    pub fn update_config(&mut self, update: CacheConfigUpdate) {
        self.config.apply(update);
    }

    /// Returns the live configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Eviction ==
    /// Evicts until there is room for one more entry.
    fn make_room(&mut self) {
        while self.entries.len() >= self.config.max_entries {
            if self.evict_oldest().is_none() {
                break;
            }
        }
    }

    /// Removes the entry with the oldest write time.
    ///
    /// Ties on `created_at` go to the lower insertion sequence. Reads do
    /// not protect an entry: this is oldest-write eviction, not LRU.
    fn evict_oldest(&mut self) -> Option<String> {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.created_at, entry.seq))
            .map(|(key, _)| key.clone())?;

        self.entries.remove(&oldest);
        self.stats.record_eviction();
        self.stats.set_size(self.entries.len());
        Some(oldest)
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Converts a monotonic duration into a wall-clock delta for snapshots.
fn to_wall_delta(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero())
}
