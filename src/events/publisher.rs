use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Review lifecycle event fan-out over a broadcast channel
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<ReviewEvent>,
}

/// Event that has been published
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewEvent {
    pub name: String,
    pub review_id: i64,
    /// Users the event is addressed to; empty means broadcast-only
    pub recipients: Vec<Uuid>,
    pub payload: Value,
    pub published_at: DateTime<Utc>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. Returns the number of subscribers that received it.
    pub fn publish(
        &self,
        name: impl Into<String>,
        review_id: i64,
        recipients: Vec<Uuid>,
        payload: Value,
    ) -> usize {
        let event = ReviewEvent {
            name: name.into(),
            review_id,
            recipients,
            payload,
            published_at: Utc::now(),
        };

        // No subscribers is fine: events are published whether or not anyone listens
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<ReviewEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000)
    }
}
