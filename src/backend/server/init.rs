/**
 * Server Initialization
 *
 * This module builds the Axum application from a `ServerConfig`.
 *
 * # Initialization Process
 *
 * 1. Open the configured store (SQLite, or memory as fallback)
 * 2. Build `AppState` around the list engine
 * 3. Seed demo data if requested
 * 4. Create and configure the router
 */

use axum::Router;

use crate::backend::auth::users::{hash_password, User};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::{AppState, AuthSettings};
use crate::shared::Principal;

/// Demo accounts; each one's password is its username
pub const DEMO_USERS: [&str; 3] = ["demo", "admin", "franta"];

struct DemoList {
    name: &'static str,
    owner: &'static str,
    members: &'static [&'static str],
    items: &'static [(&'static str, bool)],
}

const DEMO_LISTS: [DemoList; 2] = [
    DemoList {
        name: "demo-list",
        owner: "admin",
        members: &["franta"],
        items: &[("Bread", false), ("Milk", true)],
    },
    DemoList {
        name: "pantry-topup",
        owner: "demo",
        members: &["admin"],
        items: &[("Pasta", false), ("Coffee", true)],
    },
];

/// Create and configure the Axum application
///
/// # Error Handling
///
/// - Missing or broken database: the in-memory store is used
/// - Seeding failures: logged, startup continues
pub async fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing sharelist backend server");

    let stores = load_database(config).await;
    let state = AppState::new(stores, config.owner_removal, AuthSettings::from_config(config));
    tracing::info!("Owner removal policy: {}", config.owner_removal);

    if config.seed_demo {
        if let Err(e) = seed_demo_data(&state).await {
            tracing::error!("Failed to seed demo data: {}", e);
        }
    }

    create_router(state, &config.client_origin)
}

/// Insert the demo users and lists that do not exist yet
///
/// Lists are built through the engine, so they obey the same rules as
/// lists created over HTTP. An existing list of the same name is left
/// untouched.
pub async fn seed_demo_data(state: &AppState) -> BackendResult<()> {
    for username in DEMO_USERS {
        if state.directory.find_user(username).await?.is_some() {
            continue;
        }
        let password_hash = hash_password(username.to_string(), state.auth.bcrypt_cost).await?;
        state
            .directory
            .insert_user(&User::new(username, password_hash))
            .await?;
    }

    for demo in &DEMO_LISTS {
        let owner = Principal::from(demo.owner);
        match state.engine.create_list(demo.name, &owner).await {
            Ok(_) => {}
            Err(BackendError::Conflict(_)) => {
                tracing::debug!("Demo list {} already present", demo.name);
                continue;
            }
            Err(e) => return Err(e),
        }

        for member in demo.members {
            state.engine.invite_member(demo.name, member, &owner).await?;
        }
        for (item, checked) in demo.items {
            state.engine.add_item(demo.name, item, &owner).await?;
            if *checked {
                state.engine.mark_item(demo.name, item, Some(true), &owner).await?;
            }
        }
    }

    tracing::info!("Demo data seeded");
    Ok(())
}
