//! Authentication Module
//!
//! This module handles user accounts, password verification and session
//! management. It provides the HTTP handlers for `/login` and `/logout`
//! and the token lookup used by the bearer middleware.
//!
//! # Architecture
//!
//! - **`users`** - User record, bcrypt hashing, login-or-register
//! - **`sessions`** - Opaque token issuance, resolution and revocation
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Authentication Flow
//!
//! 1. **Login**: username + password → user found (password verified) or
//!    created → session token returned
//! 2. **Requests**: `Authorization: Bearer <token>` → session looked up →
//!    principal attached to the request
//! 3. **Logout**: the presented token is deleted server-side
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are random and carry no information; all state is server-side
//! - Sessions expire after the configured TTL (30 days by default)

/// User data model and password handling
pub mod users;

/// Session token management
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{AuthResponse, LoginRequest, UserResponse};
pub use handlers::{login, logout};
