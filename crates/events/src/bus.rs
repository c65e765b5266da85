//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for registry events.
//! It is designed to be shared via `Arc<EventBus>` across the application
//! and attached to the registry with
//! [`NotificationRegistry::with_sink`](paycode_core::NotificationRegistry::with_sink).

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use paycode_core::{EventSink, RegistryEvent};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// PublishedEvent
// ---------------------------------------------------------------------------

/// A registry event as seen by bus subscribers.
///
/// Serializes flat, e.g.
/// `{"sequence":3,"timestamp":"…","event":"NotificationSent","sender":"a","recipient":"b"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedEvent {
    /// Position in the bus stream, starting at 1. Gaps on a receiver mean
    /// it lagged.
    pub sequence: u64,

    /// When the event was published (UTC).
    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub event: RegistryEvent,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every [`PublishedEvent`].
///
/// # Usage
///
/// ```rust
/// use paycode_core::RegistryEvent;
/// use paycode_events::EventBus;
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.broadcast(RegistryEvent::registered("alice-code"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PublishedEvent>,
    next_sequence: AtomicU64,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            next_sequence: AtomicU64::new(1),
        }
    }

    /// Stamp `event` with the next sequence number and send it to all
    /// current subscribers. Returns the assigned sequence number.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn broadcast(&self, event: RegistryEvent) -> u64 {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let published = PublishedEvent {
            sequence,
            timestamp: Utc::now(),
            event,
        };
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(published);
        sequence
    }

    /// Subscribe to all events published on this bus from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventSink for EventBus {
    fn publish(&self, event: &RegistryEvent) {
        self.broadcast(event.clone());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use paycode_core::NotificationRegistry;

    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.broadcast(RegistryEvent::notification_sent("alice-code", "bob-code"));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.sequence, 1);
        assert_eq!(
            received.event,
            RegistryEvent::notification_sent("alice-code", "bob-code")
        );
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.broadcast(RegistryEvent::registered("alice-code"));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1, e2);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers -- this must not panic.
        assert_eq!(bus.broadcast(RegistryEvent::registered("orphan")), 1);
        assert_eq!(bus.broadcast(RegistryEvent::registered("orphan-2")), 2);
    }

    #[test]
    fn published_event_serializes_flat() {
        let event = PublishedEvent {
            sequence: 7,
            timestamp: Utc::now(),
            event: RegistryEvent::notification_sent("alice-code", "bob-code"),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["sequence"], 7);
        assert_eq!(json["event"], "NotificationSent");
        assert_eq!(json["sender"], "alice-code");
        assert_eq!(json["recipient"], "bob-code");
        assert!(json["timestamp"].is_string());

        let back: PublishedEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[tokio::test]
    async fn registry_events_arrive_in_call_order() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let registry = NotificationRegistry::in_memory().with_sink(bus.clone());

        registry.register("alice-code").await.unwrap();
        registry.register("alice-code").await.unwrap();
        registry.notify("alice-code", "bob-code").await.unwrap();
        registry.notify("alice-code", "bob-code").await.unwrap_err();
        registry.notify("alice-code", "eve-code").await.unwrap();

        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push(event);
        }

        let sequences: Vec<u64> = received.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert_eq!(
            received.into_iter().map(|e| e.event).collect::<Vec<_>>(),
            vec![
                RegistryEvent::registered("alice-code"),
                RegistryEvent::notification_sent("alice-code", "bob-code"),
                RegistryEvent::notification_sent("alice-code", "eve-code"),
            ]
        );
    }
}
