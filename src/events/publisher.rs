use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::constants::system::EVENT_CHANNEL_CAPACITY;

/// Broadcast publisher for wizard lifecycle events
///
/// Presentation shells and audit consumers subscribe to observe transitions
/// without being wired in as callbacks.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

/// Event that has been published
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    /// Event name from [`crate::constants::events`]
    pub name: String,
    /// Flow instance the event belongs to
    pub flow_id: Uuid,
    /// JSON context describing the transition
    pub context: Value,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event with the given name and context
    ///
    /// Publishing without subscribers is not an error; lifecycle events are
    /// emitted whether or not anyone is listening.
    pub fn publish(&self, event_name: impl Into<String>, flow_id: Uuid, context: Value) {
        let event = PublishedEvent {
            name: event_name.into(),
            flow_id,
            context,
            published_at: chrono::Utc::now(),
        };

        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            tracing::trace!(event = %event.name, "No subscribers for lifecycle event");
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Error types for event publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Event channel is closed")]
    ChannelClosed,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::events;
    use serde_json::json;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let publisher = EventPublisher::default();
        let mut receiver = publisher.subscribe();
        let flow_id = Uuid::new_v4();

        publisher.publish(events::STEP_CHANGED, flow_id, json!({"from": 0, "to": 1}));

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.name, events::STEP_CHANGED);
        assert_eq!(event.flow_id, flow_id);
        assert_eq!(event.context["to"], 1);
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let publisher = EventPublisher::default();
        publisher.publish(events::FORM_RESET, Uuid::new_v4(), json!({}));
        assert_eq!(publisher.subscriber_count(), 0);
    }
}
