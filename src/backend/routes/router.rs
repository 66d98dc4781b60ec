/**
 * Router Configuration
 *
 * This module combines all route configurations into a single Axum
 * router and wraps it in the cross-cutting layers.
 *
 * # Layers (outermost first)
 *
 * 1. `TraceLayer` - one span per request, response status and latency
 * 2. `CorsLayer` - only the configured client origin
 * 3. Bearer middleware - attaches the principal when the token resolves
 */

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::middleware::auth_middleware;
use crate::backend::routes::api_routes::{configure_api_routes, configure_auth_routes};
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - engine, directory and auth settings
/// * `client_origin` - the only origin CORS admits
///
/// # Fallback
///
/// Unknown routes answer 404 `{"message": "Not found"}`.
pub fn create_router(app_state: AppState, client_origin: &str) -> Router<()> {
    let router = Router::new().route("/", get(health));
    let router = configure_auth_routes(router);
    let router = configure_api_routes(router);

    router
        .fallback(not_found)
        .layer(from_fn_with_state(app_state.clone(), auth_middleware))
        .layer(cors_layer(client_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(client_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match HeaderValue::from_str(client_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!("Invalid CLIENT_ORIGIN {:?}; cross-origin requests disabled", client_origin);
            layer
        }
    }
}

/// GET /
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "API is running" }))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}
