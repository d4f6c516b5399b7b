use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use waypost_core::error::CoreError;

use crate::storage::BlobStoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent `{error, code}` JSON
/// bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `waypost_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx. This is the persistence-failure case:
    /// always surfaced, never retried inside the core.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A blob store error from the storage collaborator.
    #[error("Blob store error: {0}")]
    BlobStore(#[from] BlobStoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BlobStore(err) => {
                tracing::error!(error = %err, "Blob store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "BLOB_STORE_ERROR",
                    "File storage is unavailable".to_string(),
                )
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a domain error to an HTTP status, stable code, and message.
///
/// Every workflow failure kind keeps its own code so clients can branch on
/// it; only the conflict family shares a status.
fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    let status = match core {
        CoreError::StageNotFound { .. }
        | CoreError::NoActiveStage { .. }
        | CoreError::ProposalNotFound { .. }
        | CoreError::NotFound { .. } => StatusCode::NOT_FOUND,

        CoreError::NoNextStage
        | CoreError::AlreadyAtFirstStage
        | CoreError::FeedbackLimitExceeded { .. }
        | CoreError::StaleProject => StatusCode::CONFLICT,

        CoreError::EmptyComment
        | CoreError::FieldNotSupported { .. }
        | CoreError::Validation(_) => StatusCode::BAD_REQUEST,

        CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
    };

    let code = match core {
        CoreError::StageNotFound { .. } => "STAGE_NOT_FOUND",
        CoreError::NoActiveStage { .. } => "NO_ACTIVE_STAGE",
        CoreError::NoNextStage => "NO_NEXT_STAGE",
        CoreError::AlreadyAtFirstStage => "ALREADY_AT_FIRST_STAGE",
        CoreError::ProposalNotFound { .. } => "PROPOSAL_NOT_FOUND",
        CoreError::EmptyComment => "EMPTY_COMMENT",
        CoreError::FeedbackLimitExceeded { .. } => "FEEDBACK_LIMIT_EXCEEDED",
        CoreError::FieldNotSupported { .. } => "FIELD_NOT_SUPPORTED",
        CoreError::StaleProject => "STALE_PROJECT",
        CoreError::NotFound { .. } => "NOT_FOUND",
        CoreError::Validation(_) => "VALIDATION_ERROR",
        CoreError::Unauthorized(_) => "UNAUTHORIZED",
        CoreError::Forbidden(_) => "FORBIDDEN",
    };

    (status, code, core.to_string())
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
