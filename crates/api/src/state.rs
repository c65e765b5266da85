use std::sync::Arc;

use paycode_core::NotificationRegistry;
use paycode_db::DbPool;
use paycode_events::EventBus;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The notification registry (memory- or PostgreSQL-backed).
    pub registry: Arc<NotificationRegistry>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus the registry publishes to; streamed to SSE clients.
    pub event_bus: Arc<EventBus>,
    /// Database pool backing the event ledger. `None` with the in-memory
    /// backend.
    pub pool: Option<DbPool>,
    /// Cancelled when the server starts shutting down. Long-lived responses
    /// (the SSE stream) end on it so connection draining can finish.
    pub shutdown: CancellationToken,
}
