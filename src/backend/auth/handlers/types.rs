/**
 * Authentication Handler Types
 *
 * Request and response bodies of the login and logout handlers.
 */

use serde::{Deserialize, Serialize};

use crate::backend::lists::validate::{Field, RequestSchema, Rule, Schema};

/// Login request
///
/// Both fields are required. The username is trimmed; the password is
/// used exactly as sent and may be at most 72 bytes.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl RequestSchema for LoginRequest {
    const SCHEMA: Schema = Schema {
        params: &[],
        query: &[],
        body: &[
            Field::new("username", Rule::string_required()),
            Field::new("password", Rule::secret_required()),
        ],
    };
}

/// Auth response
///
/// Returned by login. The token is opaque and must be sent back as
/// `Authorization: Bearer <token>`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// User response (without sensitive data)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub username: String,
}

/// Plain `{ "message": ... }` body
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
