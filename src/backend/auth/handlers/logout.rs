/**
 * Logout Handler
 *
 * `POST /logout` revokes the token the request was authenticated with.
 * Other sessions of the same user stay valid.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::auth::sessions::revoke_session;
use crate::backend::error::BackendResult;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> BackendResult<Json<MessageResponse>> {
    revoke_session(state.directory.as_ref(), &user.token).await?;
    tracing::info!("User logged out: {}", user.principal);
    Ok(Json(MessageResponse::new("Logged out")))
}
