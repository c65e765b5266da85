//! Registry event ledger model.

use paycode_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `registry_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoredEvent {
    pub id: DbId,
    /// Bus sequence number assigned when the event was published. Gaps
    /// between consecutive rows mean the ledger writer missed events.
    pub sequence: i64,
    /// Event name, e.g. `"NotificationSent"`.
    pub event_name: String,
    /// Full serialized event.
    pub payload: Json<serde_json::Value>,
    pub emitted_at: Timestamp,
    pub created_at: Timestamp,
}
