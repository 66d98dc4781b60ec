/**
 * Authentication Middleware
 *
 * This module resolves bearer tokens to principals. The middleware runs
 * on every route and does not reject bad credentials: a missing, malformed,
 * unknown or expired token simply leaves the request unauthenticated.
 * Handlers that need a principal ask for one with the `AuthUser` extractor,
 * which is where the 401 comes from. A directory that cannot be read ends
 * the request with a 500.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::backend::auth::sessions::resolve_principal;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::Principal;

/// Authenticated user data resolved from the bearer token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub principal: Principal,
    /// The token the request presented, needed to log out
    pub token: String,
}

/// Pull `<token>` out of `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Looks the token up in the principal directory
/// 3. Attaches `AuthenticatedUser` to the request extensions on success
///
/// A directory failure short-circuits with `500 Internal server error`;
/// it is never mistaken for a missing credential.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()).map(str::to_owned) {
        match resolve_principal(state.directory.as_ref(), &token).await {
            Ok(Some(principal)) => {
                request
                    .extensions_mut()
                    .insert(AuthenticatedUser { principal, token });
            }
            Ok(None) => tracing::debug!("Bearer token did not resolve to a session"),
            Err(e) => return BackendError::from(e).into_response(),
        }
    }

    next.run(request).await
}

/// Axum extractor for the authenticated user
///
/// Rejects with `401 Not authenticated` when the middleware attached
/// no user.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or(BackendError::Unauthenticated)
    }
}
