use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Registered payment codes, if the backend answered.
    pub registered_codes: Option<u64>,
    /// Accepted notifications, if the backend answered.
    pub notifications: Option<u64>,
}

/// GET /health -- returns service status and registry counts.
///
/// Reports `degraded` when the storage backend cannot be queried.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = match state.registry.stats().await {
        Ok(stats) => Some(stats),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not read registry stats");
            None
        }
    };

    Json(HealthResponse {
        status: if stats.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        registered_codes: stats.map(|s| s.registered_codes),
        notifications: stats.map(|s| s.notifications),
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
