pub mod codes;
pub mod events;
pub mod health;
pub mod notifications;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /codes                               register (POST)
/// /codes/{code}                        registration status
/// /codes/{code}/notifications          mailbox for a code
///
/// /notifications                       notify (POST), mailbox by ?recipient=
///
/// /stats                               registration / notification counts
/// /events                              live event stream (SSE)
/// /ledger                              persisted events (PostgreSQL only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/codes", codes::router())
        .nest("/notifications", notifications::router())
        .merge(events::router())
}
