//! Backend Error Module
//!
//! This module defines the error taxonomy every list, item, member and
//! authentication operation reports through. Errors are returned directly
//! from handlers and converted into HTTP responses.
//!
//! # Architecture
//!
//! The error module is organized into focused submodules:
//!
//! - **`types`** - Error type definitions, constructors and status mapping
//! - **`conversion`** - `IntoResponse` implementation (JSON error bodies)
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Error Kinds
//!
//! - `Unauthenticated` - no or invalid credential where one is required (401)
//! - `Forbidden` - authenticated but lacking the required relation to the list (403)
//! - `NotFound` - list, item, member or user absent (404)
//! - `BadRequest` - missing, empty, oversized or malformed input (400)
//! - `Conflict` - name collision, or the owner trying to remove themselves (400)
//! - `ArchivedReadOnly` - item mutation on an archived list (400)
//! - `Internal` / `Store` - backing-service failure (500, generic message)
//!
//! Every check fails fast; nothing is retried on the caller's behalf.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, BackendResult};
