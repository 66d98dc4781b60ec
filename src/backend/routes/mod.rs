//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! - **`router`** - main router creation, layers and fallback
//! - **`api_routes`** - authentication and shopping-list endpoints
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - Endpoint registration
//! ```

/// Main router creation
pub mod router;

/// API endpoint registration
pub mod api_routes;

pub use router::create_router;
