//! Repository for the `registrations` table.
//!
//! Payment codes are bound as their UTF-8 bytes (`BYTEA`), so any string,
//! including one containing NUL, round-trips unchanged.

use sqlx::PgPool;

/// Provides insert and lookup operations for registered payment codes.
pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Insert a payment code unless it is already registered.
    ///
    /// Returns `true` if a row was created.
    pub async fn insert_if_absent(pool: &PgPool, payment_code: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO registrations (payment_code) VALUES ($1) \
             ON CONFLICT ON CONSTRAINT uq_registrations_payment_code DO NOTHING",
        )
        .bind(payment_code.as_bytes())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, payment_code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM registrations WHERE payment_code = $1)",
        )
        .bind(payment_code.as_bytes())
        .fetch_one(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
            .fetch_one(pool)
            .await
    }
}
