//! Broadcast channel for view-invalidation announcements.
//!
//! [`ViewNotifier`] wraps a [`tokio::sync::broadcast`] channel. Every
//! state mutation publishes a [`ViewInvalidation`] through the notifier,
//! and consumers (the WebSocket feed, external renderers/caches)
//! subscribe to receive them.

use tokio::sync::broadcast;

use super::view_key::{ViewInvalidation, ViewKey};

/// Broadcast bus for [`ViewInvalidation`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest announcements are dropped
/// for lagging receivers.
#[derive(Debug, Clone)]
pub struct ViewNotifier {
    sender: broadcast::Sender<ViewInvalidation>,
}

impl ViewNotifier {
    /// Creates a new `ViewNotifier` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Announces a set of stale view keys to all subscribers.
    ///
    /// Returns the number of receivers that saw the announcement. With
    /// no active receivers the announcement is silently dropped.
    pub fn notify(&self, keys: Vec<ViewKey>) -> usize {
        if keys.is_empty() {
            return 0;
        }
        tracing::debug!(count = keys.len(), "view invalidation");
        self.sender
            .send(ViewInvalidation::now(keys))
            .unwrap_or(0)
    }

    /// Creates a new receiver that will see all future announcements.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ViewInvalidation> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ids::EventId;

    #[test]
    fn notify_without_receivers_returns_zero() {
        let notifier = ViewNotifier::new(16);
        let count = notifier.notify(ViewKey::for_event(EventId::new()));
        assert_eq!(count, 0);
    }

    #[test]
    fn empty_key_set_is_not_published() {
        let notifier = ViewNotifier::new(16);
        let mut rx = notifier.subscribe();
        notifier.notify(Vec::new());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn subscriber_receives_key_set() {
        let notifier = ViewNotifier::new(16);
        let mut rx = notifier.subscribe();

        let id = EventId::new();
        notifier.notify(ViewKey::for_event(id));

        let invalidation = rx.recv().await;
        let Ok(invalidation) = invalidation else {
            panic!("expected invalidation");
        };
        assert_eq!(invalidation.keys.len(), 5);
        assert!(invalidation.keys.contains(&ViewKey::AdminRoster(id)));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_announcement() {
        let notifier = ViewNotifier::new(16);
        let mut rx1 = notifier.subscribe();
        let mut rx2 = notifier.subscribe();

        let count = notifier.notify(vec![ViewKey::AdminEventList]);
        assert_eq!(count, 2);

        let Ok(a) = rx1.recv().await else {
            panic!("rx1 failed");
        };
        let Ok(b) = rx2.recv().await else {
            panic!("rx2 failed");
        };
        assert_eq!(a.keys, b.keys);
    }
}
