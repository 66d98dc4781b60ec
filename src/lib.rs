//! Sharelist - Main Library
//!
//! Sharelist is a multi-user shopping list service. Users log in, create
//! named lists, invite other users and collaboratively add, check and
//! remove items. Every operation is checked against the list's ownership
//! and membership before it is applied.
//!
//! # Module Structure
//!
//! - **`shared`** - Model types usable without the server stack
//!   - `Principal`, `ShoppingList`, `Item`, `ItemSet`, `ItemStats`
//!   - Name normalisation and model-level errors
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server
//!   - List access and mutation engine
//!   - Authentication with opaque server-side sessions
//!   - In-memory and SQLite stores
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend modules and the
//!   `sharelist-server` binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use sharelist::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let app = create_app(&config).await;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for model validation
//! - `backend::error::BackendError` for everything a request can fail with,
//!   mapped to HTTP statuses and `{"message": ...}` bodies

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
