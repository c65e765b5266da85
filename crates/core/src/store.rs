//! Storage backend seam for the registry, plus the in-memory backend.
//!
//! A [`RegistryStore`] holds the three registry structures (registration
//! set, notification edges, mailboxes) and must make each individual insert
//! atomic. Ordering of multi-step operations and event emission is the
//! job of [`NotificationRegistry`](crate::NotificationRegistry).

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use indexmap::IndexSet;

use crate::error::CoreError;
use crate::types::RegistryStats;

/// Persistence operations required by the registry.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Add `payment_code` to the registration set.
    ///
    /// Returns `true` if it was newly added, `false` if already present.
    async fn insert_registration(&self, payment_code: &str) -> Result<bool, CoreError>;

    /// Whether `payment_code` is in the registration set.
    async fn is_registered(&self, payment_code: &str) -> Result<bool, CoreError>;

    /// Atomically create the (sender, recipient) edge and append `sender` to
    /// the recipient's mailbox.
    ///
    /// Returns `false` without changing anything if the edge already exists.
    async fn insert_edge(&self, sender: &str, recipient: &str) -> Result<bool, CoreError>;

    /// Senders that notified `recipient`, in acceptance order.
    async fn mailbox(&self, recipient: &str) -> Result<Vec<String>, CoreError>;

    /// Registration and edge counts.
    async fn stats(&self) -> Result<RegistryStats, CoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Mailboxes {
    /// recipient -> senders in insertion order. Membership doubles as the
    /// edge set.
    by_recipient: HashMap<String, IndexSet<String>>,
    edge_count: u64,
}

/// Process-local [`RegistryStore`].
///
/// State only grows, so a poisoned lock still guards consistent data and is
/// recovered rather than propagated.
#[derive(Default)]
pub struct MemoryStore {
    registrations: RwLock<HashSet<String>>,
    mailboxes: RwLock<Mailboxes>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistryStore for MemoryStore {
    async fn insert_registration(&self, payment_code: &str) -> Result<bool, CoreError> {
        let mut registrations = self
            .registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if registrations.contains(payment_code) {
            return Ok(false);
        }
        Ok(registrations.insert(payment_code.to_owned()))
    }

    async fn is_registered(&self, payment_code: &str) -> Result<bool, CoreError> {
        let registrations = self
            .registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(registrations.contains(payment_code))
    }

    async fn insert_edge(&self, sender: &str, recipient: &str) -> Result<bool, CoreError> {
        let mut mailboxes = self.mailboxes.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(senders) = mailboxes.by_recipient.get(recipient) {
            if senders.contains(sender) {
                return Ok(false);
            }
        }

        mailboxes
            .by_recipient
            .entry(recipient.to_owned())
            .or_default()
            .insert(sender.to_owned());
        mailboxes.edge_count += 1;
        Ok(true)
    }

    async fn mailbox(&self, recipient: &str) -> Result<Vec<String>, CoreError> {
        let mailboxes = self.mailboxes.read().unwrap_or_else(PoisonError::into_inner);
        Ok(mailboxes
            .by_recipient
            .get(recipient)
            .map(|senders| senders.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn stats(&self) -> Result<RegistryStats, CoreError> {
        let registered_codes = self
            .registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len() as u64;
        let notifications = self
            .mailboxes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .edge_count;
        Ok(RegistryStats {
            registered_codes,
            notifications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_registration_reports_first_insert_only() {
        let store = MemoryStore::new();
        assert!(store.insert_registration("alice-code").await.unwrap());
        assert!(!store.insert_registration("alice-code").await.unwrap());
        assert!(store.is_registered("alice-code").await.unwrap());
        assert!(!store.is_registered("bob-code").await.unwrap());
    }

    #[tokio::test]
    async fn insert_edge_rejects_existing_pair() {
        let store = MemoryStore::new();
        assert!(store.insert_edge("a", "b").await.unwrap());
        assert!(!store.insert_edge("a", "b").await.unwrap());
        assert!(store.insert_edge("b", "a").await.unwrap());
        assert_eq!(store.mailbox("b").await.unwrap(), vec!["a"]);
        assert_eq!(store.mailbox("a").await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn mailbox_preserves_insertion_order() {
        let store = MemoryStore::new();
        for sender in ["zed", "amy", "mid"] {
            store.insert_edge(sender, "inbox").await.unwrap();
        }
        assert_eq!(store.mailbox("inbox").await.unwrap(), vec!["zed", "amy", "mid"]);
    }

    #[tokio::test]
    async fn unknown_mailbox_is_empty() {
        let store = MemoryStore::new();
        assert!(store.mailbox("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stats_count_registrations_and_edges() {
        let store = MemoryStore::new();
        store.insert_registration("a").await.unwrap();
        store.insert_registration("a").await.unwrap();
        store.insert_registration("b").await.unwrap();
        store.insert_edge("a", "b").await.unwrap();
        store.insert_edge("a", "b").await.unwrap();
        store.insert_edge("a", "c").await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(
            stats,
            RegistryStats {
                registered_codes: 2,
                notifications: 2,
            }
        );
    }
}
