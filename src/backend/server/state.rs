/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` traits used by Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - the list engine (which owns the list store)
 * - the principal directory (users and sessions)
 * - authentication settings (session TTL, bcrypt cost)
 *
 * All of it is cheap to clone: stores sit behind `Arc`.
 */

use axum::extract::FromRef;
use chrono::Duration;
use std::sync::Arc;

use crate::backend::lists::{ListEngine, OwnerRemovalPolicy};
use crate::backend::server::config::{ServerConfig, Stores};
use crate::backend::store::PrincipalDirectory;

/// Settings used when issuing credentials
#[derive(Debug, Clone, Copy)]
pub struct AuthSettings {
    pub session_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl AuthSettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            session_ttl: config.session_ttl(),
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

/// Shared state of every request handler
#[derive(Clone)]
pub struct AppState {
    /// List access and mutation engine
    pub engine: ListEngine,
    /// Users and sessions
    pub directory: Arc<dyn PrincipalDirectory>,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(stores: Stores, policy: OwnerRemovalPolicy, auth: AuthSettings) -> Self {
        let engine = ListEngine::new(stores.lists, stores.directory.clone(), policy);
        Self {
            engine,
            directory: stores.directory,
            auth,
        }
    }

    /// Fresh in-memory state configured from `config`
    pub fn in_memory(config: &ServerConfig) -> Self {
        Self::new(
            Stores::in_memory(),
            config.owner_removal,
            AuthSettings::from_config(config),
        )
    }
}

/// Lets handlers take `State<ListEngine>` directly
impl FromRef<AppState> for ListEngine {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.engine.clone()
    }
}
