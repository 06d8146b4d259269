//! Error responses for request extraction
//!
//! Operation failures are ordinary envelopes with HTTP 200. Only requests
//! that never reach an operation (missing or invalid parameters) are
//! answered with HTTP 400, still in the `{code, message, data?}` shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use room_core::RoomError;
use room_service::OpResponse;
use thiserror::Error;
use tracing::debug;
use validator::ValidationErrors;

/// API error type for rejected requests
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    InvalidQuery(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Get error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidQuery(_) => "INVALID_QUERY_PARAMETER",
        }
    }

    /// Create an invalid query error
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Envelope carried in the response body
    pub fn envelope(&self) -> OpResponse {
        let err = RoomError::invalid(self.to_string());

        // Field-level details for validation errors
        let data = match self {
            Self::Validation(errors) => serde_json::to_value(errors).ok(),
            Self::InvalidQuery(_) => None,
        };

        OpResponse {
            code: err.result_code(),
            message: err.to_string(),
            data,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(code = self.error_code(), error = %self, "Request rejected");
        (self.status_code(), Json(self.envelope())).into_response()
    }
}
