//! PostgreSQL storage for the payment-code registry.
//!
//! - [`create_pool`], [`health_check`], [`run_migrations`] — connection
//!   bootstrap used by the API binary.
//! - [`repositories`] — zero-sized repository structs over `&PgPool`.
//! - [`PgRegistryStore`] — the [`RegistryStore`](paycode_core::RegistryStore)
//!   implementation backed by those repositories.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::PgRegistryStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
