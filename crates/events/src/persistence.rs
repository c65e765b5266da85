//! Durable event persistence service.
//!
//! [`EventPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and appends every received [`PublishedEvent`] to the
//! `registry_events` table. It runs as a long-lived background task and
//! shuts down gracefully when the bus is dropped.
//!
//! The ledger is best-effort. The registry commits a transition before the
//! event reaches this writer, so an event lost to receiver lag or a failed
//! insert leaves no row. Bus sequence numbers are dense from 1, so a missing
//! `sequence` in the ledger marks exactly the transitions that were lost.

use paycode_core::types::DbId;
use paycode_db::repositories::EventRepo;
use paycode_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::PublishedEvent;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Background service that persists registry events to the database.
pub struct EventPersistence;

impl EventPersistence {
    /// Run the persistence loop.
    ///
    /// Persists every event received on `receiver`. Events skipped by lag or
    /// rejected by the database are logged and left as sequence gaps. The
    /// loop exits when the channel is closed (i.e. the
    /// [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PublishedEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            sequence = event.sequence,
                            event_name = event.event.name(),
                            "Failed to persist event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Event persistence lagged, ledger has a sequence gap"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Write a single event to the `registry_events` table.
    pub async fn persist(pool: &DbPool, event: &PublishedEvent) -> Result<DbId, PersistenceError> {
        let payload = serde_json::to_string(&event.event)?;
        let sequence = i64::try_from(event.sequence).unwrap_or(i64::MAX);

        let id = EventRepo::insert(pool, sequence, event.event.name(), &payload, event.timestamp)
            .await?;
        Ok(id)
    }
}
