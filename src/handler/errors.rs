use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures a request can report. Every variant collapses to the same
/// `{"error": <message>}` envelope on the wire; the taxonomy exists so
/// store failures can be logged with their cause before flattening.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A request field is missing or malformed.
    #[error("{0}")]
    Validation(String),
    /// The referenced user id does not resolve to a stored user.
    #[error("{0}")]
    NotFound(String),
    /// The underlying database operation failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(cause) = &self {
            tracing::error!(cause = ?cause, "store operation failed");
        }
        // Business failures answer 200; only unmatched routes get a
        // non-200 status.
        (StatusCode::OK, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Fallback for any route the router does not know.
pub async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json("API endpoint not found"))
}
