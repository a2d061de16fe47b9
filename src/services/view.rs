//! Shared holder for the latest categorized snapshot.

use std::sync::{Arc, Mutex};

use crate::types::PositionView;

/// Single-writer, many-reader holder for the most recent position view.
///
/// The polling loop publishes a fully built snapshot; readers clone the
/// `Arc` out. The lock is held only for the swap or the copy, never
/// while a view is being computed.
#[derive(Default)]
pub struct LatestView {
    inner: Mutex<Option<Arc<PositionView>>>,
}

impl LatestView {
    /// Create an empty holder with no published view yet.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Atomically replace the published view.
    pub fn publish(&self, view: PositionView) {
        let view = Arc::new(view);
        let mut guard = self.inner.lock().unwrap();
        *guard = Some(view);
    }

    /// The most recent snapshot, if any cycle has completed.
    pub fn snapshot(&self) -> Option<Arc<PositionView>> {
        self.inner.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Buckets, Stats};

    fn make_view(total_trades: usize) -> PositionView {
        PositionView {
            buckets: Buckets::default(),
            stats: Stats {
                total_trades,
                ..Default::default()
            },
            growth_candidates: vec![],
            last_update: "2024-01-15 12:00:00".to_string(),
        }
    }

    #[test]
    fn test_snapshot_empty_before_first_publish() {
        let holder = LatestView::new();
        assert!(holder.snapshot().is_none());
    }

    #[test]
    fn test_publish_then_snapshot() {
        let holder = LatestView::new();
        holder.publish(make_view(3));

        let snapshot = holder.snapshot().unwrap();
        assert_eq!(snapshot.stats.total_trades, 3);
    }

    #[test]
    fn test_publish_replaces_previous_view() {
        let holder = LatestView::new();
        holder.publish(make_view(3));
        holder.publish(make_view(7));

        let snapshot = holder.snapshot().unwrap();
        assert_eq!(snapshot.stats.total_trades, 7);
    }

    #[test]
    fn test_old_snapshot_survives_republish() {
        let holder = LatestView::new();
        holder.publish(make_view(3));

        let held = holder.snapshot().unwrap();
        holder.publish(make_view(7));

        // A reader's copy is immutable and unaffected by later publishes.
        assert_eq!(held.stats.total_trades, 3);
        assert_eq!(holder.snapshot().unwrap().stats.total_trades, 7);
    }
}
