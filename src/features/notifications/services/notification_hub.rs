use std::sync::Arc;

use tokio::sync::broadcast;

use crate::features::notifications::models::NotificationEvent;

/// In-process fan-out of notification events to SSE subscribers.
///
/// Publishing never blocks: a subscriber that falls more than the channel
/// capacity behind skips the missed events and is told how many it lost.
pub struct NotificationHub {
    sender: broadcast::Sender<Arc<NotificationEvent>>,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns the number of live subscribers the event reached
    pub fn publish(&self, event: NotificationEvent) -> usize {
        tracing::debug!(
            kind = event.kind.as_str(),
            entity_id = %event.entity_id,
            "Publishing notification"
        );
        // Err only means nobody is listening right now
        self.sender.send(Arc::new(event)).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<NotificationEvent>> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::models::NotificationKind;
    use serde_json::json;
    use uuid::Uuid;

    fn event() -> NotificationEvent {
        NotificationEvent::new(
            NotificationKind::AssignmentCreated,
            None,
            Uuid::new_v4(),
            json!({}),
        )
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_not_an_error() {
        let hub = NotificationHub::new(8);
        assert_eq!(hub.publish(event()), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let hub = NotificationHub::new(8);
        let mut rx = hub.subscribe();
        let sent = event();
        let id = sent.id;

        assert_eq!(hub.publish(sent), 1);
        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, id);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_events() {
        let hub = NotificationHub::new(2);
        let mut rx = hub.subscribe();
        for _ in 0..5 {
            hub.publish(event());
        }

        match rx.recv().await {
            Err(broadcast::error::RecvError::Lagged(n)) => assert_eq!(n, 3),
            other => panic!("expected lag, got {:?}", other.map(|e| e.id)),
        }
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_subscriber_count() {
        let hub = NotificationHub::new(4);
        let _a = hub.subscribe();
        let _b = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);
    }
}
