//! Shared Error Types
//!
//! This module defines error types that are raised by the shared model,
//! independent of any transport. The backend converts them into
//! `BackendError::SharedError`, which is answered as `400 Bad Request`.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - A field failed a model rule (empty or oversized name,
//!   duplicate item in a persisted item sequence)
//!
//! # Usage
//!
//! ```rust
//! use sharelist::shared::error::SharedError;
//!
//! let error = SharedError::validation("name", "Item name is required");
//! assert_eq!(error.to_string(), "Item name is required");
//! ```
use thiserror::Error;

/// Errors raised by the shared model
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    ///
    /// Displays only the message, which is what clients see.
    #[error("{message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field name for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => Some(field),
            Self::SerializationError { .. } => None,
        }
    }
}

/// Helper trait for converting serialization errors
impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
