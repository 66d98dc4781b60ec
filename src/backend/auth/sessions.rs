/**
 * Session Management
 *
 * This module issues and resolves opaque bearer tokens. A token carries
 * no information by itself; it is a random key into the `sessions` table
 * of the principal directory, which maps it to a username until it
 * expires or is revoked by logout.
 */

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::store::{PrincipalDirectory, StoreResult};
use crate::shared::Principal;

/// A server-side session record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Opaque bearer token (64 hex chars)
    pub token: String,
    /// Username the token resolves to
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Generate a fresh, unguessable token
///
/// Two v4 UUIDs give 244 random bits, rendered as 64 lowercase hex chars.
pub fn generate_token() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

/// Create and persist a session for `username`
pub async fn issue_session(
    directory: &dyn PrincipalDirectory,
    username: &str,
    ttl: Duration,
) -> StoreResult<Session> {
    let now = Utc::now();
    let session = Session {
        token: generate_token(),
        username: username.to_string(),
        created_at: now,
        expires_at: now + ttl,
    };
    directory.insert_session(&session).await?;
    tracing::debug!("Issued session for {}", username);
    Ok(session)
}

/// Resolve a bearer token to its principal
///
/// Unknown and expired tokens resolve to `None`; expired sessions are
/// deleted on the way.
pub async fn resolve_principal(
    directory: &dyn PrincipalDirectory,
    token: &str,
) -> StoreResult<Option<Principal>> {
    let Some(session) = directory.find_session(token).await? else {
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        tracing::debug!("Session for {} expired", session.username);
        directory.delete_session(token).await?;
        return Ok(None);
    }

    Ok(Some(Principal::new(session.username)))
}

/// Revoke a token; `false` if it was not active
pub async fn revoke_session(directory: &dyn PrincipalDirectory, token: &str) -> StoreResult<bool> {
    directory.delete_session(token).await
}
