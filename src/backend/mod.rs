//! Backend Module
//!
//! This module contains all server-side code: the Axum HTTP server, the
//! list access and mutation engine, authentication and persistence.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - configuration, application state, app assembly
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`lists`** - authorization gates, validation, the engine, handlers
//! - **`auth`** - users, bcrypt, opaque sessions, login/logout
//! - **`store`** - `ListStore` / `PrincipalDirectory` with memory and
//!   SQLite implementations
//! - **`middleware`** - bearer token resolution
//! - **`error`** - `BackendError` and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - sharelist-server binary
//! ├── server/         - Config, state, initialization
//! ├── routes/         - Route configuration
//! ├── lists/          - Access gates, validation, engine, handlers
//! ├── auth/           - Authentication
//! ├── store/          - Persistence
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Consistency
//!
//! No request holds a lock across its whole lifetime. Each mutation is a
//! versioned read-modify-write against the store; a concurrent writer to
//! the same list forces a reload and a fresh evaluation of every gate.
//! Lists with different names never contend.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Shopping list engine and handlers
pub mod lists;

/// Authentication and user management
pub mod auth;

/// Durable store
pub mod store;

/// Middleware for request processing
pub mod middleware;

/// Backend error types
pub mod error;

pub use error::{BackendError, BackendResult};
pub use lists::{ListEngine, OwnerRemovalPolicy};
pub use server::{create_app, AppState, ServerConfig};
