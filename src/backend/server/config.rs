/**
 * Server Configuration
 *
 * This module loads `ServerConfig` and opens the configured store.
 *
 * # Configuration Sources
 *
 * Applied in order, later sources winning:
 * 1. Built-in defaults
 * 2. The TOML file named by `SHARELIST_CONFIG`, if set
 * 3. Environment variables (`.env` is loaded by the binary first)
 *
 * # Error Handling
 *
 * Malformed or out-of-range values are a `ConfigError` and stop startup.
 * A database that
 * cannot be opened is not: it is logged and the server continues on the
 * in-memory store.
 */

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::backend::lists::OwnerRemovalPolicy;
use crate::backend::store::{ListStore, MemoryStore, PrincipalDirectory, SqliteStore};

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_VAR: &str = "SHARELIST_CONFIG";

/// Longest session lifetime accepted (ten years)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

/// Work factors bcrypt accepts
const BCRYPT_COSTS: std::ops::RangeInclusive<u32> = 4..=31;

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {message}")]
    InvalidEnv { var: &'static str, message: String },

    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP port
    pub port: u16,
    /// `sqlite://…` URL; `None` keeps everything in memory
    pub database_url: Option<String>,
    /// Allowed CORS origin
    pub client_origin: String,
    pub owner_removal: OwnerRemovalPolicy,
    pub session_ttl_hours: i64,
    pub bcrypt_cost: u32,
    /// Seed demo users and lists at startup
    pub seed_demo: bool,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            database_url: None,
            client_origin: "http://localhost:8080".to_string(),
            owner_removal: OwnerRemovalPolicy::Forbid,
            session_ttl_hours: 24 * 30,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            seed_demo: false,
            log_filter: "info,sharelist=debug".to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults, then `SHARELIST_CONFIG`, then the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.with_env(|var| std::env::var(var).ok())
    }

    /// Parse a TOML file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply environment overrides read through `lookup`
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = parse_env("SERVER_PORT", &port)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            let url = url.trim();
            self.database_url = (!url.is_empty()).then(|| url.to_string());
        }
        if let Some(origin) = lookup("CLIENT_ORIGIN") {
            self.client_origin = origin;
        }
        if let Some(policy) = lookup("OWNER_REMOVAL") {
            self.owner_removal = policy.parse().map_err(|message| ConfigError::InvalidEnv {
                var: "OWNER_REMOVAL",
                message,
            })?;
        }
        if let Some(hours) = lookup("SESSION_TTL_HOURS") {
            self.session_ttl_hours = parse_env("SESSION_TTL_HOURS", &hours)?;
            check_session_ttl(self.session_ttl_hours)
                .map_err(|message| ConfigError::InvalidEnv { var: "SESSION_TTL_HOURS", message })?;
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            self.bcrypt_cost = parse_env("BCRYPT_COST", &cost)?;
            check_bcrypt_cost(self.bcrypt_cost)
                .map_err(|message| ConfigError::InvalidEnv { var: "BCRYPT_COST", message })?;
        }
        if let Some(seed) = lookup("SEED_DEMO") {
            self.seed_demo = parse_env("SEED_DEMO", &seed.to_ascii_lowercase())?;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.log_filter = filter;
        }
        self.validate()
    }

    /// Range-check values that a file or a struct literal may have set
    pub fn validate(self) -> Result<Self, ConfigError> {
        check_session_ttl(self.session_ttl_hours)
            .map_err(|message| ConfigError::Invalid { field: "session_ttl_hours", message })?;
        check_bcrypt_cost(self.bcrypt_cost)
            .map_err(|message| ConfigError::Invalid { field: "bcrypt_cost", message })?;
        Ok(self)
    }

    /// Session lifetime, clamped to `1..=MAX_SESSION_TTL_HOURS` hours
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS))
    }
}

fn check_session_ttl(hours: i64) -> Result<(), String> {
    if (1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        Ok(())
    } else {
        Err(format!("{hours} hours is outside 1..={MAX_SESSION_TTL_HOURS}"))
    }
}

fn check_bcrypt_cost(cost: u32) -> Result<(), String> {
    if BCRYPT_COSTS.contains(&cost) {
        Ok(())
    } else {
        Err(format!("cost {cost} is outside 4..=31"))
    }
}

fn parse_env<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        var,
        message: e.to_string(),
    })
}

/// The list store and principal directory the server runs on
pub struct Stores {
    pub lists: Arc<dyn ListStore>,
    pub directory: Arc<dyn PrincipalDirectory>,
}

impl Stores {
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            lists: store.clone(),
            directory: store,
        }
    }
}

/// Open the configured store
///
/// Without a `database_url`, or when the database cannot be opened or
/// migrated, data lives in memory for the lifetime of the process.
pub async fn load_database(config: &ServerConfig) -> Stores {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Lists are kept in memory only.");
        return Stores::in_memory();
    };

    tracing::info!("Connecting to database...");
    match SqliteStore::connect(url).await {
        Ok(store) => {
            tracing::info!("Database ready, migrations applied");
            let store = Arc::new(store);
            Stores {
                lists: store.clone(),
                directory: store,
            }
        }
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            tracing::warn!("Falling back to the in-memory store.");
            Stores::in_memory()
        }
    }
}
