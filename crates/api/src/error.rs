use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mga_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Only request-shape problems end up here. Analyzer failures are part of
/// the normal report payload.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mga_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        tracing::debug!(%status, code, error = %message, "Rejected request");

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
