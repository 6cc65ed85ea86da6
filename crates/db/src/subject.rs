use std::sync::Arc;

use tokio::sync::broadcast;

/// A full snapshot of a collection, shared between every subscriber.
pub type Snapshot<T> = Arc<[T]>;

const SUBJECT_CAPACITY: usize = 16;

/// Push stream of collection snapshots.
///
/// Every emission carries the whole collection, so a subscriber that lags
/// behind only needs the next snapshot to catch up.
pub struct Subject<T> {
    sender: broadcast::Sender<Snapshot<T>>,
}

impl<T: Clone + Send + Sync + 'static> Subject<T> {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SUBJECT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot<T>> {
        self.sender.subscribe()
    }

    /// Pushes a snapshot to current subscribers. Returns how many received it.
    pub fn next(&self, items: &[T]) -> usize {
        self.sender.send(Arc::from(items)).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}
