//! Handlers for registration, notification delivery, and mailbox lookup.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use paycode_core::RegistryStats;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /codes`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub payment_code: String,
}

/// Body for `POST /notifications`, echoed back on success.
#[derive(Debug, Serialize, Deserialize)]
pub struct NotifyRequest {
    pub sender: String,
    pub recipient: String,
}

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct MailboxQuery {
    pub recipient: String,
}

/// Registration status of a single payment code.
#[derive(Debug, Serialize)]
pub struct CodeStatus {
    pub payment_code: String,
    pub registered: bool,
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// POST /api/v1/codes
///
/// Register a payment code. Idempotent; always 204 No Content.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    state.registry.register(&input.payment_code).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/codes/{code}
pub async fn get_code(
    State(state): State<AppState>,
    Path(payment_code): Path<String>,
) -> AppResult<Json<DataResponse<CodeStatus>>> {
    let registered = state.registry.is_registered(&payment_code).await?;
    Ok(Json(DataResponse {
        data: CodeStatus {
            payment_code,
            registered,
        },
    }))
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// POST /api/v1/notifications
///
/// Deliver a one-time notification. Returns 201 with the accepted pair,
/// 403 if the sender is not registered, 409 if the pair already exists.
pub async fn notify(
    State(state): State<AppState>,
    Json(input): Json<NotifyRequest>,
) -> AppResult<impl IntoResponse> {
    state.registry.notify(&input.sender, &input.recipient).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: input })))
}

/// GET /api/v1/codes/{code}/notifications
///
/// Senders that notified `code`, oldest first.
pub async fn code_notifications(
    State(state): State<AppState>,
    Path(recipient): Path<String>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let senders = state.registry.get_notifications(&recipient).await?;
    Ok(Json(DataResponse { data: senders }))
}

/// GET /api/v1/notifications?recipient=...
///
/// Same as [`code_notifications`], for identifiers that cannot be written as
/// a path segment (e.g. the empty string).
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<MailboxQuery>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let senders = state.registry.get_notifications(&params.recipient).await?;
    Ok(Json(DataResponse { data: senders }))
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// GET /api/v1/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DataResponse<RegistryStats>>> {
    let stats = state.registry.stats().await?;
    Ok(Json(DataResponse { data: stats }))
}
