/**
 * Login Handler
 *
 * This module implements `POST /login`.
 *
 * # Authentication Process
 *
 * 1. Validate the body (`username`, `password` required)
 * 2. Look up the user; create it on first login
 * 3. Verify the password using bcrypt
 * 4. Issue an opaque session token
 * 5. Return token and user info
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::sessions::issue_session;
use crate::backend::auth::users::login_or_register;
use crate::backend::error::BackendResult;
use crate::backend::lists::validate::Validated;
use crate::backend::server::state::AppState;
use crate::shared::normalize_name;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - missing or empty username or password, or a
///   password over 72 bytes
/// * `401 Unauthorized` - `Wrong password` for an existing username
/// * `500 Internal Server Error` - hashing or store failure
///
/// # Example Request
///
/// ```http
/// POST /login HTTP/1.1
/// Content-Type: application/json
///
/// { "username": "alice", "password": "secret" }
/// ```
///
/// # Example Response
///
/// ```json
/// { "token": "3f9c…", "user": { "username": "alice" } }
/// ```
pub async fn login(
    State(state): State<AppState>,
    Validated(request): Validated<LoginRequest>,
) -> BackendResult<Json<AuthResponse>> {
    let username = normalize_name(&request.username, "Username")?;
    tracing::info!("Login request for: {}", username);

    let outcome = login_or_register(
        state.directory.as_ref(),
        &username,
        &request.password,
        state.auth.bcrypt_cost,
    )
    .await?;

    let session = issue_session(state.directory.as_ref(), &username, state.auth.session_ttl).await?;

    tracing::info!(
        "User logged in successfully: {} (new account: {})",
        outcome.user.username,
        outcome.registered
    );

    Ok(Json(AuthResponse {
        token: session.token,
        user: UserResponse {
            username: outcome.user.username,
        },
    }))
}
