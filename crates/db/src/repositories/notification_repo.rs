//! Repository for the `notifications` table.
//!
//! Each row is one (sender, recipient) edge; the unique constraint
//! `uq_notifications_sender_recipient` enforces at-most-once delivery even
//! across processes sharing the database. Identifiers are stored as UTF-8
//! bytes.

use sqlx::PgPool;

/// Provides insert and mailbox queries for notification edges.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert the (sender, recipient) edge unless it already exists.
    ///
    /// Returns `true` if a row was created.
    pub async fn insert_if_absent(
        pool: &PgPool,
        sender: &str,
        recipient: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO notifications (sender, recipient) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_notifications_sender_recipient DO NOTHING",
        )
        .bind(sender.as_bytes())
        .bind(recipient.as_bytes())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Senders that notified `recipient`, oldest first.
    pub async fn list_senders(pool: &PgPool, recipient: &str) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<Vec<u8>> =
            sqlx::query_scalar("SELECT sender FROM notifications WHERE recipient = $1 ORDER BY id")
                .bind(recipient.as_bytes())
                .fetch_all(pool)
                .await?;

        rows.into_iter()
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|e| sqlx::Error::Decode(Box::new(e)))
            })
            .collect()
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications")
            .fetch_one(pool)
            .await
    }
}
