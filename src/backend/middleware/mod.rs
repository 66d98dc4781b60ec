//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - bearer token resolution and the `AuthUser` extractor

pub mod auth;

pub use auth::{auth_middleware, bearer_token, AuthUser, AuthenticatedUser};
