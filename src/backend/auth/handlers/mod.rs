//! Authentication Handlers Module
//!
//! HTTP handlers for the authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── login.rs    - Login (and first-login registration) handler
//! └── logout.rs   - Session revocation handler
//! ```
//!
//! # Handlers
//!
//! - **`login`** - POST /login - authenticate, returns a bearer token
//! - **`logout`** - POST /logout - revoke the presented token

/// Request and response types
pub mod types;

/// Login handler
pub mod login;

/// Logout handler
pub mod logout;

pub use types::{AuthResponse, LoginRequest, MessageResponse, UserResponse};

pub use login::login;
pub use logout::logout;
