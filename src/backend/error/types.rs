/**
 * Backend Error Types
 *
 * This module defines the error taxonomy of the list access and mutation
 * engine. Every variant maps to exactly one HTTP status code and a
 * client-facing message.
 *
 * # Error Categories
 *
 * ## Caller Errors
 *
 * Deterministic functions of the input and the current list record:
 * - Missing or invalid credentials
 * - Missing relation to the list (not owner, not member)
 * - Absent list, item, member or user
 * - Invalid input, name collisions, archived lists
 *
 * They are safe to retry once the input is corrected.
 *
 * ## Internal Errors
 *
 * Store or backing-service failures. They are logged server-side and
 * answered with a generic message so no internals leak to the caller.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Result alias used across the backend
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend error taxonomy
///
/// # Usage
///
/// ```rust
/// use sharelist::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found("Shopping list not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
///
/// let err = BackendError::ArchivedReadOnly;
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// No credential, or one that does not resolve to a principal
    #[error("Not authenticated")]
    Unauthenticated,

    /// Known username, wrong password
    #[error("Wrong password")]
    WrongPassword,

    /// Authenticated, but not permitted on this list
    #[error("{0}")]
    Forbidden(String),

    /// List, item, member or target user does not exist
    #[error("{0}")]
    NotFound(String),

    /// Invalid input; `errors` carries one entry per failing field
    #[error("{message}")]
    BadRequest {
        /// Human-readable summary
        message: String,
        /// Per-field failures, empty for single-cause rejections
        errors: Vec<String>,
    },

    /// Name collision, or a disallowed owner self-removal
    #[error("{0}")]
    Conflict(String),

    /// Item mutation attempted on an archived list
    #[error("Shopping list is archived and cannot be modified")]
    ArchivedReadOnly,

    /// Unexpected failure inside the server
    #[error("Internal error: {0}")]
    Internal(String),

    /// Model validation error (from the shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Durable store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BackendError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Single-cause bad request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Aggregated validation failure
    pub fn invalid_input(errors: Vec<String>) -> Self {
        Self::BadRequest {
            message: "Invalid input".to_string(),
            errors,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Unauthenticated`, `WrongPassword` - 401
    /// - `Forbidden` - 403
    /// - `NotFound` - 404
    /// - `BadRequest`, `Conflict`, `ArchivedReadOnly` - 400
    /// - `SharedError` - 400 for validation, 500 for serialization
    /// - `Internal`, `Store` - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::WrongPassword => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::ArchivedReadOnly => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the error must stay opaque to the caller
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Get the client-facing error message
    ///
    /// Internal failures collapse to a generic message.
    pub fn message(&self) -> String {
        if self.is_internal() {
            return "Internal server error".to_string();
        }
        self.to_string()
    }

    /// Per-field validation failures, if any
    pub fn field_errors(&self) -> &[String] {
        match self {
            Self::BadRequest { errors, .. } => errors,
            _ => &[],
        }
    }
}
