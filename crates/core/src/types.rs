use serde::{Deserialize, Serialize};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Aggregate counts over the registry state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Number of distinct registered payment codes.
    pub registered_codes: u64,
    /// Number of accepted (sender, recipient) notification edges.
    pub notifications: u64,
}
