use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns every task a view spawned and stops all of them together.
///
/// Dropping the group disposes it.
#[derive(Debug, Default)]
pub struct SubscriptionGroup {
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl SubscriptionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` until it finishes or the group is disposed.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.clone();
        self.tasks.push(tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {},
                _ = task => {},
            }
        }));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn dispose(&mut self) {
        self.token.cancel();
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for SubscriptionGroup {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::SubscriptionGroup;

    #[tokio::test]
    async fn dispose_stops_every_task() {
        let (sender, mut receiver) = mpsc::channel::<u32>(4);
        let mut group = SubscriptionGroup::new();

        for _ in 0..3 {
            let sender = sender.clone();
            group.spawn(async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    if sender.send(1).await.is_err() {
                        return;
                    }
                }
            });
        }
        drop(sender);
        assert_eq!(group.len(), 3);
        assert!(receiver.recv().await.is_some());

        group.dispose();
        assert!(group.is_disposed());
        assert!(group.is_empty());

        // Every sender clone is dropped with its task, closing the channel.
        while receiver.recv().await.is_some() {}
    }

    #[tokio::test]
    async fn dropping_the_group_cancels_its_token() {
        let group = SubscriptionGroup::new();
        let token = group.token();
        drop(group);
        assert!(token.is_cancelled());
    }
}
