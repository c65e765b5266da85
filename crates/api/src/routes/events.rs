use axum::routing::get;
use axum::Router;

use crate::handlers::{events, ledger, registry};
use crate::state::AppState;

/// Observability routes: `/stats`, the `/events` SSE stream and the
/// persisted `/ledger`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(registry::stats))
        .route("/events", get(events::stream_events))
        .route("/ledger", get(ledger::list_ledger))
}
