//! Snapshot publication for rendered metrics.
//!
//! The poller is the sole writer; scrape handlers are concurrent readers.
//! Publication is a single atomic pointer swap, so a reader always observes
//! the complete output of one collection cycle, never interleaved output
//! from two cycles. No lock is held on either side.

use std::sync::Arc;

use arc_swap::ArcSwap;

/// Snapshot text served before the first collection cycle completes.
pub const INITIAL_SNAPSHOT: &str = "Initialization";

/// Holds the most recently published metrics snapshot.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<String>,
}

impl SnapshotStore {
    /// Create a store seeded with the startup sentinel.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(INITIAL_SNAPSHOT.to_string()),
        }
    }

    /// Replace the published snapshot wholesale.
    pub fn publish(&self, snapshot: String) {
        self.current.store(Arc::new(snapshot));
    }

    /// The currently published snapshot.
    pub fn current(&self) -> Arc<String> {
        self.current.load_full()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_snapshot_is_sentinel() {
        let store = SnapshotStore::new();
        assert_eq!(store.current().as_str(), INITIAL_SNAPSHOT);
    }

    #[test]
    fn test_publish_replaces_wholesale() {
        let store = SnapshotStore::new();
        store.publish("metric_a 1\nmetric_b 2\n".to_string());
        assert_eq!(store.current().as_str(), "metric_a 1\nmetric_b 2\n");

        store.publish(String::new());
        assert_eq!(store.current().as_str(), "");
    }

    #[test]
    fn test_readers_keep_their_snapshot_across_publishes() {
        let store = SnapshotStore::new();
        store.publish("cycle_one 1\n".to_string());

        let held = store.current();
        store.publish("cycle_two 2\n".to_string());

        // A reader that loaded before the swap still sees its full cycle.
        assert_eq!(held.as_str(), "cycle_one 1\n");
        assert_eq!(store.current().as_str(), "cycle_two 2\n");
    }
}
