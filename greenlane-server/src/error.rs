//! API error type and its HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use greenlane::EngineError;

/// Errors surfaced by request handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required field is missing or empty
    #[error("{0}")]
    Validation(String),

    /// The engine has no model loaded
    #[error("Analysis failed")]
    NotReady,

    /// The request body is not a JSON object
    #[error("Invalid JSON: {0}")]
    MalformedRequest(String),

    #[error("Server error: {0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotReady | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotReady => ApiError::NotReady,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
