//! PostgreSQL-backed [`RegistryStore`].

use async_trait::async_trait;
use paycode_core::{CoreError, RegistryStats, RegistryStore};

use crate::repositories::{NotificationRepo, RegistrationRepo};
use crate::DbPool;

/// [`RegistryStore`] over the `registrations` and `notifications` tables.
///
/// Edge creation is a single `INSERT ... ON CONFLICT DO NOTHING`, so the
/// mailbox append and the duplicate check are one atomic statement.
#[derive(Clone)]
pub struct PgRegistryStore {
    pool: DbPool,
}

impl PgRegistryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistryStore for PgRegistryStore {
    async fn insert_registration(&self, payment_code: &str) -> Result<bool, CoreError> {
        RegistrationRepo::insert_if_absent(&self.pool, payment_code)
            .await
            .map_err(CoreError::storage)
    }

    async fn is_registered(&self, payment_code: &str) -> Result<bool, CoreError> {
        RegistrationRepo::exists(&self.pool, payment_code)
            .await
            .map_err(CoreError::storage)
    }

    async fn insert_edge(&self, sender: &str, recipient: &str) -> Result<bool, CoreError> {
        NotificationRepo::insert_if_absent(&self.pool, sender, recipient)
            .await
            .map_err(CoreError::storage)
    }

    async fn mailbox(&self, recipient: &str) -> Result<Vec<String>, CoreError> {
        NotificationRepo::list_senders(&self.pool, recipient)
            .await
            .map_err(CoreError::storage)
    }

    async fn stats(&self) -> Result<RegistryStats, CoreError> {
        let registered_codes = RegistrationRepo::count(&self.pool)
            .await
            .map_err(CoreError::storage)?;
        let notifications = NotificationRepo::count(&self.pool)
            .await
            .map_err(CoreError::storage)?;
        Ok(RegistryStats {
            registered_codes: registered_codes.max(0) as u64,
            notifications: notifications.max(0) as u64,
        })
    }
}
