//! Error translation at the HTTP boundary.
//!
//! Every failure becomes the `{"message": "<text>"}` envelope. Malformed
//! requests (bad injection JSON, a label while labels are disabled) map to
//! 400; everything the pipeline raises maps to 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use config_backend::BackendError;
use confserve_core::ResolveError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Response error: {}", self.message);
        (self.status, Json(json!({"message": self.message}))).into_response()
    }
}
