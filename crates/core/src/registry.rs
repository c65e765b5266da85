//! The notification registry.
//!
//! [`NotificationRegistry`] enforces the registration / at-most-once
//! notification state machine over any [`RegistryStore`] and publishes
//! accepted transitions to its [`EventSink`]s.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::event::{EventSink, RegistryEvent};
use crate::store::{MemoryStore, RegistryStore};
use crate::types::RegistryStats;

/// Registry of payment codes and the one-time notifications between them.
///
/// Mutations (`register`, `notify`) pass through a single write gate, which
/// makes them linearizable and keeps the event stream in the same order as
/// the accepted calls. Reads go straight to the store.
///
/// Designed to be shared via `Arc<NotificationRegistry>`.
pub struct NotificationRegistry {
    store: Arc<dyn RegistryStore>,
    sinks: Vec<Arc<dyn EventSink>>,
    write_gate: Mutex<()>,
}

impl NotificationRegistry {
    /// Create an empty registry over the given store.
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self {
            store,
            sinks: Vec::new(),
            write_gate: Mutex::new(()),
        }
    }

    /// Create a registry backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Attach an event sink. Every sink sees every event.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Register a payment code. Repeating the call is a no-op.
    pub async fn register(&self, payment_code: &str) -> Result<(), CoreError> {
        let _gate = self.write_gate.lock().await;

        if self.store.insert_registration(payment_code).await? {
            tracing::debug!(payment_code, "Registered payment code");
            self.emit(&RegistryEvent::registered(payment_code));
        }
        Ok(())
    }

    /// Deliver a one-time notification from `sender` to `recipient`.
    ///
    /// Fails with [`CoreError::SenderNotRegistered`] if `sender` never
    /// registered, then with [`CoreError::DuplicateNotification`] if the pair
    /// already exists. A failed call changes nothing and emits nothing.
    /// `recipient` does not need to be registered.
    pub async fn notify(&self, sender: &str, recipient: &str) -> Result<(), CoreError> {
        let _gate = self.write_gate.lock().await;

        if !self.store.is_registered(sender).await? {
            tracing::info!(sender, recipient, "Rejected notification: sender not registered");
            return Err(CoreError::SenderNotRegistered {
                sender: sender.to_owned(),
            });
        }

        if !self.store.insert_edge(sender, recipient).await? {
            tracing::info!(sender, recipient, "Rejected notification: duplicate");
            return Err(CoreError::DuplicateNotification {
                sender: sender.to_owned(),
                recipient: recipient.to_owned(),
            });
        }

        tracing::debug!(sender, recipient, "Notification accepted");
        self.emit(&RegistryEvent::notification_sent(sender, recipient));
        Ok(())
    }

    /// Senders that notified `recipient`, oldest first. Empty if none.
    pub async fn get_notifications(&self, recipient: &str) -> Result<Vec<String>, CoreError> {
        self.store.mailbox(recipient).await
    }

    pub async fn is_registered(&self, payment_code: &str) -> Result<bool, CoreError> {
        self.store.is_registered(payment_code).await
    }

    pub async fn stats(&self) -> Result<RegistryStats, CoreError> {
        self.store.stats().await
    }

    fn emit(&self, event: &RegistryEvent) {
        for sink in &self.sinks {
            sink.publish(event);
        }
    }
}
