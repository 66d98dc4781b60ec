//! Shopping Lists Module
//!
//! The list access and mutation engine and its HTTP surface.
//!
//! # Architecture
//!
//! - **`access`** - authorization gates (access, owner, removal) and the
//!   owner-removal policy
//! - **`validate`** - declarative per-request schemas and the `Validated`
//!   extractor
//! - **`engine`** - `ListEngine`, every list, item and member operation
//! - **`handlers`** - axum handlers, one per route
//!
//! # Request Flow
//!
//! ```text
//! bearer middleware → AuthUser → Validated<schema> → handler
//!     → ListEngine: load → gates → checks → apply → versioned put
//! ```

/// Authorization gates
pub mod access;

/// Request validation
pub mod validate;

/// List access and mutation engine
pub mod engine;

/// HTTP handlers
pub mod handlers;

pub use access::OwnerRemovalPolicy;
pub use engine::{ListEngine, ListUpdate, Membership};
