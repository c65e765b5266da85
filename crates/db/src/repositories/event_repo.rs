//! Repository for the `registry_events` ledger table.

use paycode_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::event::StoredEvent;

/// Column list for `registry_events` queries.
///
/// `payload` is stored as text and cast to `json` on read; `jsonb` would
/// reject the `\u0000` escape.
const COLUMNS: &str = "id, sequence, event_name, payload::json AS payload, emitted_at, created_at";

/// Provides append and listing operations for the event ledger.
pub struct EventRepo;

impl EventRepo {
    /// Append one event row, returning the generated ID.
    ///
    /// `payload` is the event serialized as a JSON document.
    pub async fn insert(
        pool: &PgPool,
        sequence: i64,
        event_name: &str,
        payload: &str,
        emitted_at: Timestamp,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO registry_events (sequence, event_name, payload, emitted_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(sequence)
        .bind(event_name)
        .bind(payload)
        .bind(emitted_at)
        .fetch_one(pool)
        .await
    }

    /// List events in insertion order.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<StoredEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM registry_events ORDER BY id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, StoredEvent>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
