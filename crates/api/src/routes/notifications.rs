//! Route definitions for the `/notifications` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::registry;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /?recipient=...        -> list_notifications
/// POST   /                      -> notify
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(registry::list_notifications).post(registry::notify),
    )
}
