/**
 * Error Conversion
 *
 * This module converts backend errors into HTTP responses.
 *
 * # Response Format
 *
 * Error responses are JSON:
 * ```json
 * { "message": "Item already exists" }
 * ```
 * Aggregated validation failures add the per-field list:
 * ```json
 * { "message": "Invalid input", "errors": ["body.name: name is required"] }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use crate::backend::error::types::BackendError;

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl From<&BackendError> for ErrorBody {
    fn from(error: &BackendError) -> Self {
        Self {
            message: error.message(),
            errors: error.field_errors().to_vec(),
        }
    }
}

impl IntoResponse for BackendError {
    /// Convert a backend error into an HTTP response
    ///
    /// Internal failures are logged here, with full detail, before the
    /// generic message goes out.
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed with internal error");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
