//! Handler for reading the persisted event ledger.

use axum::extract::{Query, State};
use axum::Json;
use paycode_db::models::event::StoredEvent;
use paycode_db::repositories::EventRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /ledger`.
#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    /// Maximum number of rows. Defaults to 100, capped at 500.
    pub limit: Option<i64>,
    /// Number of rows to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Maximum page size for ledger listing.
const MAX_LIMIT: i64 = 500;

/// Default page size for ledger listing.
const DEFAULT_LIMIT: i64 = 100;

/// GET /api/v1/ledger
///
/// Persisted registry events in write order. Each row carries the bus
/// `sequence`, so a missing number between rows marks an event the ledger
/// writer never stored. Only available with the PostgreSQL backend.
pub async fn list_ledger(
    State(state): State<AppState>,
    Query(params): Query<LedgerQuery>,
) -> AppResult<Json<DataResponse<Vec<StoredEvent>>>> {
    let pool = state.pool.as_ref().ok_or(AppError::LedgerUnavailable)?;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(0, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let events = EventRepo::list(pool, limit, offset).await?;
    Ok(Json(DataResponse { data: events }))
}
