//! Snapshot Module
//!
//! Structural export/import representation of the store's contents.
//!
//! Snapshots carry wall-clock timestamps so they stay meaningful across
//! process boundaries; the engine's own expiry decisions always use the
//! monotonic clock. Carrying a snapshot over the wire in some concrete
//! format is the caller's concern; `to_json`/`from_json` cover the common
//! case.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// == Snapshot Entry ==
/// One exported entry with its original timing preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry<V> {
    /// The stored value
    pub value: V,
    /// Wall-clock equivalent of the entry's last write time
    pub created_at: DateTime<Utc>,
    /// Wall-clock equivalent of the entry's expiration time
    pub expires_at: DateTime<Utc>,
    /// TTL left at export time
    pub remaining_ttl: Duration,
}

// == Snapshot ==
/// Full structural snapshot of a store's unexpired entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<V> {
    /// Exported entries by key
    pub entries: HashMap<String, SnapshotEntry<V>>,
}

impl<V> Default for Snapshot<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> Snapshot<V> {
    /// Returns the number of entries in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the snapshot holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Snapshot<V> {
    // == To JSON ==
    /// Projects the snapshot into JSON.
    ///
    /// An entry whose value cannot be represented as JSON is flagged in
    /// `skipped` instead of aborting the whole projection.
    pub fn to_json(&self) -> JsonSnapshot {
        let mut entries = serde_json::Map::new();
        let mut skipped = Vec::new();

        for (key, entry) in &self.entries {
            match serde_json::to_value(entry) {
                Ok(value) => {
                    entries.insert(key.clone(), value);
                }
                Err(_) => skipped.push(key.clone()),
            }
        }

        skipped.sort();
        JsonSnapshot { entries, skipped }
    }
}

impl<V: DeserializeOwned> Snapshot<V> {
    // == From JSON ==
    /// Rebuilds a snapshot from its JSON form.
    ///
    /// Accepts both a plain serialized [`Snapshot`] and the output of
    /// [`Snapshot::to_json`] (the `skipped` list is ignored).
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

// == JSON Snapshot ==
/// JSON projection of a snapshot with per-entry failure flagging.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSnapshot {
    /// Entries that serialized cleanly
    pub entries: serde_json::Map<String, serde_json::Value>,
    /// Keys whose values could not be represented as JSON
    pub skipped: Vec<String>,
}
