use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paycode_core::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for registry errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent
/// `{ "error": ..., "code": ... }` JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A registry error from `paycode_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx (ledger queries).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The event ledger was requested but no database is configured.
    #[error("Event ledger requires a database backend")]
    LedgerUnavailable,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::SenderNotRegistered { .. } => (
                    StatusCode::FORBIDDEN,
                    "SENDER_NOT_REGISTERED",
                    core.to_string(),
                ),
                CoreError::DuplicateNotification { .. } => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_NOTIFICATION",
                    core.to_string(),
                ),
                CoreError::Storage(err) => {
                    tracing::error!(error = %err, "Registry storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::LedgerUnavailable => (
                StatusCode::NOT_FOUND,
                "LEDGER_UNAVAILABLE",
                self.to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
