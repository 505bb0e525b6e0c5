//! Web error types for the editor-shell API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::models::{ApiEnvelope, DraftError};

/// Error type for web API operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request with validation error.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if let WebError::Internal(msg) = &self {
            tracing::error!("Internal server error: {}", msg);
        }

        let body = Json(ApiEnvelope::<()>::failure(self.to_string()));
        (self.status(), body).into_response()
    }
}

impl From<DraftError> for WebError {
    fn from(err: DraftError) -> Self {
        WebError::BadRequest(err.to_string())
    }
}
