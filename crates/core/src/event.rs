//! Registry state-transition events and the sink hook that publishes them.
//!
//! [`NotificationRegistry`](crate::NotificationRegistry) calls every attached
//! [`EventSink`] exactly once per accepted transition, while still holding
//! its write gate, so sinks observe events in linearization order.

use serde::{Deserialize, Serialize};

/// Event name for [`RegistryEvent::Registered`].
pub const EVENT_REGISTERED: &str = "Registered";
/// Event name for [`RegistryEvent::NotificationSent`].
pub const EVENT_NOTIFICATION_SENT: &str = "NotificationSent";

/// A state transition accepted by the registry.
///
/// Serialized with an `event` tag, e.g.
/// `{"event":"NotificationSent","sender":"a","recipient":"b"}`. Field order
/// of `NotificationSent` (sender, then recipient) is part of the external
/// contract with indexers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RegistryEvent {
    /// A payment code was registered for the first time.
    Registered { payment_code: String },

    /// `sender` notified `recipient`.
    NotificationSent { sender: String, recipient: String },
}

impl RegistryEvent {
    pub fn notification_sent(sender: impl Into<String>, recipient: impl Into<String>) -> Self {
        RegistryEvent::NotificationSent {
            sender: sender.into(),
            recipient: recipient.into(),
        }
    }

    pub fn registered(payment_code: impl Into<String>) -> Self {
        RegistryEvent::Registered {
            payment_code: payment_code.into(),
        }
    }

    /// Stable event name, matching the serialized `event` tag.
    pub fn name(&self) -> &'static str {
        match self {
            RegistryEvent::Registered { .. } => EVENT_REGISTERED,
            RegistryEvent::NotificationSent { .. } => EVENT_NOTIFICATION_SENT,
        }
    }
}

/// Receiver of registry events.
///
/// Implementations must not block: `publish` runs inside the registry's
/// write critical section.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &RegistryEvent);
}
