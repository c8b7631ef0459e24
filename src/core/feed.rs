//! Snapshot delivery.
//!
//! A [`Snapshot`] is the full current contents of one record collection.
//! [`SnapshotFeed`] hands the latest snapshot to any number of subscribers;
//! each new snapshot replaces the previous one wholesale, and subscribers
//! re-aggregate it from scratch. Snapshots published faster than a subscriber
//! reads them are coalesced, so only the newest is observed.

use std::sync::Arc;
use tokio::sync::watch;

/// Full contents of a collection at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    /// Decoded records in insertion order
    pub records: Vec<T>,
    /// Stored documents that could not be decoded and were left out
    pub skipped: usize,
}

impl<T> Snapshot<T> {
    /// Snapshot with no records and nothing skipped.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }

    /// True when some stored documents were left out of this snapshot.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.skipped > 0
    }

    /// Number of decoded records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the snapshot holds no decoded records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Receiving end of a feed.
pub type SnapshotReceiver<T> = watch::Receiver<Arc<Snapshot<T>>>;

/// Publishes full snapshots of one collection to subscribers.
#[derive(Debug)]
pub struct SnapshotFeed<T> {
    sender: watch::Sender<Arc<Snapshot<T>>>,
}

impl<T> SnapshotFeed<T> {
    /// Feed whose current value is `initial`.
    #[must_use]
    pub fn new(initial: Snapshot<T>) -> Self {
        let (sender, _) = watch::channel(Arc::new(initial));
        Self { sender }
    }

    /// New subscriber. The current snapshot is available immediately through
    /// `borrow()`; `changed()` resolves on the next publish.
    #[must_use]
    pub fn subscribe(&self) -> SnapshotReceiver<T> {
        self.sender.subscribe()
    }

    /// Replaces the current snapshot and notifies subscribers.
    pub fn publish(&self, snapshot: Snapshot<T>) {
        if snapshot.is_degraded() {
            tracing::warn!(
                skipped = snapshot.skipped,
                records = snapshot.records.len(),
                "publishing degraded snapshot"
            );
        }
        self.sender.send_replace(Arc::new(snapshot));
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<Snapshot<T>> {
        Arc::clone(&self.sender.borrow())
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T> Default for SnapshotFeed<T> {
    fn default() -> Self {
        Self::new(Snapshot::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_degraded_flag() {
        let clean: Snapshot<u32> = Snapshot {
            records: vec![1, 2],
            skipped: 0,
        };
        assert!(!clean.is_degraded());
        assert_eq!(clean.len(), 2);

        let degraded: Snapshot<u32> = Snapshot {
            records: vec![],
            skipped: 1,
        };
        assert!(degraded.is_degraded());
        assert!(degraded.is_empty());
    }

    #[test]
    fn test_publish_replaces_current() {
        let feed: SnapshotFeed<u32> = SnapshotFeed::default();
        assert!(feed.current().is_empty());

        feed.publish(Snapshot {
            records: vec![7],
            skipped: 0,
        });
        assert_eq!(feed.current().records, vec![7]);
    }

    #[tokio::test]
    async fn test_subscriber_sees_latest_snapshot() {
        let feed: SnapshotFeed<&str> = SnapshotFeed::default();
        let mut rx = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);

        feed.publish(Snapshot {
            records: vec!["a"],
            skipped: 0,
        });
        feed.publish(Snapshot {
            records: vec!["a", "b"],
            skipped: 0,
        });

        assert!(rx.changed().await.is_ok());
        let latest = Arc::clone(&rx.borrow_and_update());
        assert_eq!(latest.records, vec!["a", "b"]);
        assert!(!rx.has_changed().unwrap_or(true));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let feed: SnapshotFeed<u8> = SnapshotFeed::default();
        feed.publish(Snapshot {
            records: vec![1],
            skipped: 2,
        });
        assert!(feed.current().is_degraded());
    }
}
