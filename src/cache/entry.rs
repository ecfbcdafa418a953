//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with its value and expiry metadata.
///
/// Timestamps are monotonic clock readings; wall-clock adjustments never
/// change an entry's lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value, opaque to the engine
    pub value: V,
    /// Timestamp of the last write
    pub created_at: Instant,
    /// Timestamp after which the entry is treated as absent
    pub expires_at: Instant,
    /// Insertion sequence, breaks eviction ties between equal timestamps
    pub(crate) seq: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    pub(crate) fn new(value: V, ttl: Duration, seq: u64) -> Self {
        let now = Instant::now();
        Self::from_parts(value, now, now + ttl, seq)
    }

    /// Creates an entry from explicit timestamps (used by snapshot import).
    pub(crate) fn from_parts(value: V, created_at: Instant, expires_at: Instant, seq: u64) -> Self {
        debug_assert!(
            created_at < expires_at,
            "entry must expire strictly after its creation"
        );
        Self {
            value,
            created_at,
            expires_at,
            seq,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to the expiration time.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining TTL, zero once expired.
    pub fn remaining_ttl(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    // == Age ==
    /// Returns the time elapsed since the last write.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.created_at)
    }
}

// == Entry Metadata ==
/// Introspection view of a single entry's timing, without the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Timestamp of the last write
    pub created_at: Instant,
    /// Timestamp after which the entry is treated as absent
    pub expires_at: Instant,
    /// TTL left at the time of the call
    pub remaining_ttl: Duration,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_secs(60), 0);

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at > entry.created_at);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_millis(10), 0);

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(30));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_remaining_ttl_counts_down() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_secs(10), 0);

        let remaining = entry.remaining_ttl();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_remaining_ttl_zero_after_expiry() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_millis(10), 0);

        sleep(Duration::from_millis(30));

        assert_eq!(entry.remaining_ttl(), Duration::ZERO);
    }

    #[test]
    fn test_age_grows() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_secs(60), 0);

        sleep(Duration::from_millis(20));

        assert!(entry.age() >= Duration::from_millis(20));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        // An entry whose expiration has just been reached must already be
        // treated as absent.
        let now = Instant::now();
        let entry = CacheEntry::from_parts(
            "test".to_string(),
            now - Duration::from_millis(10),
            now,
            0,
        );

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
