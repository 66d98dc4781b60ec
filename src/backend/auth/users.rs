/**
 * User Model and Password Handling
 *
 * This module handles user records and bcrypt password hashing.
 * Users are identified by username only; the username is the principal.
 *
 * # Registration
 *
 * There is no separate signup: the first successful login for an unknown
 * username creates the account (`login_or_register`).
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::store::PrincipalDirectory;

/// User struct representing a row of the `users` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique username
    pub username: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

/// Outcome of a login attempt that passed the password check
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    /// `true` when this login created the account
    pub registered: bool,
}

/// Hash a password with bcrypt on the blocking pool
pub async fn hash_password(password: String, cost: u32) -> BackendResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| BackendError::internal(format!("hashing task failed: {e}")))?
        .map_err(|e| BackendError::internal(format!("bcrypt hash failed: {e}")))
}

/// Verify a password against a bcrypt hash on the blocking pool
pub async fn verify_password(password: String, password_hash: String) -> BackendResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| BackendError::internal(format!("verify task failed: {e}")))?
        .map_err(|e| BackendError::internal(format!("bcrypt verify failed: {e}")))
}

/// Authenticate `username`, creating the account if it does not exist yet
///
/// # Errors
///
/// * `WrongPassword` - the username exists and the password does not match
/// * `Internal` / `Store` - hashing or directory failure
pub async fn login_or_register(
    directory: &dyn PrincipalDirectory,
    username: &str,
    password: &str,
    cost: u32,
) -> BackendResult<LoginOutcome> {
    if let Some(user) = directory.find_user(username).await? {
        return check_password(user, password).await;
    }

    let password_hash = hash_password(password.to_string(), cost).await?;
    let user = User::new(username, password_hash);

    if directory.insert_user(&user).await? {
        tracing::info!("Registered new user: {}", username);
        return Ok(LoginOutcome {
            user,
            registered: true,
        });
    }

    // Lost a registration race; the winner's password applies.
    let existing = directory
        .find_user(username)
        .await?
        .ok_or_else(|| BackendError::internal(format!("user {username} vanished after insert")))?;
    check_password(existing, password).await
}

async fn check_password(user: User, password: &str) -> BackendResult<LoginOutcome> {
    if !verify_password(password.to_string(), user.password_hash.clone()).await? {
        tracing::warn!("Invalid password for user: {}", user.username);
        return Err(BackendError::WrongPassword);
    }
    Ok(LoginOutcome {
        user,
        registered: false,
    })
}
