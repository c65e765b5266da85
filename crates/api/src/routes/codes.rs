//! Route definitions for the `/codes` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::registry;
use crate::state::AppState;

/// Routes mounted at `/codes`.
///
/// ```text
/// POST   /                      -> register
/// GET    /{code}                -> get_code
/// GET    /{code}/notifications  -> code_notifications
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(registry::register))
        .route("/{code}", get(registry::get_code))
        .route("/{code}/notifications", get(registry::code_notifications))
}
