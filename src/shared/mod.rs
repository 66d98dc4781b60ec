//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and any client of the shopping-list API. These types are
//! used for serialization over HTTP and carry the model-level invariants
//! (item name uniqueness, item ordering, name normalisation).
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! without the server stack (no axum, no sqlx). Everything here is plain
//! serde data plus pure functions.

/// Principal (username) identity type
pub mod principal;

/// Shopping list, item and item-set model
pub mod list;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use principal::Principal;
pub use list::{Item, ItemSet, ItemStats, ShoppingList, normalize_name, MAX_NAME_LEN};
pub use error::SharedError;
