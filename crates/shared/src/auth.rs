//! Authentication types for JWT claims and auth payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for identity tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Desired username (unique).
    pub username: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Contact email. At least one of email / phone number is required.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number. At least one of email / phone number is required.
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Token issued after successful registration or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The identity token.
    pub token: String,
    /// Token validity in seconds.
    pub expires_in: i64,
}

impl TokenResponse {
    /// Creates a new token response.
    #[must_use]
    pub const fn new(token: String, expires_in: i64) -> Self {
        Self { token, expires_in }
    }
}
