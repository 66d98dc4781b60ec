//! Server Module
//!
//! This module contains the code that turns a configuration into a
//! running Axum application.
//!
//! # Architecture
//!
//! - **`config`** - `ServerConfig` loading (defaults, TOML, environment)
//!   and store selection
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`init`** - application assembly and demo seeding
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - Configuration loading, store selection
//! ├── state.rs        - AppState and FromRef implementations
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::load()`
//! 2. **Store Selection**: SQLite when `database_url` opens, memory otherwise
//! 3. **State Creation**: `AppState` wraps the list engine and directory
//! 4. **Seeding**: demo users and lists when `seed_demo` is set
//! 5. **Router Creation**: routes, auth middleware, CORS, tracing

/// Server configuration loading
pub mod config;

/// Application state management
pub mod state;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::create_app;
pub use state::AppState;
