pub mod extractors;
pub mod guard;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod token;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::models::User;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use guard::owns;
pub use identity::Identity;
pub use middleware::AuthMiddleware;
pub use token::{Claims, InvalidToken, TokenCodec};

/// Password hashing plus token issuance/verification, configured once at startup.
///
/// Cheap to clone and read-only, so every worker shares the same instance.
#[derive(Clone)]
pub struct Credentials {
    tokens: TokenCodec,
    bcrypt_cost: u32,
    // Verified against when an email is unknown so signin timing does not
    // reveal whether the account exists.
    decoy_hash: String,
}

impl Credentials {
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let decoy_hash = password::hash_password(&Uuid::new_v4().to_string(), config.bcrypt_cost())?;
        Ok(Self {
            tokens: TokenCodec::new(config),
            bcrypt_cost: config.bcrypt_cost(),
            decoy_hash,
        })
    }

    pub fn hash_password(&self, plaintext: &str) -> Result<String, AppError> {
        password::hash_password(plaintext, self.bcrypt_cost)
    }

    pub fn verify_password(&self, plaintext: &str, hash: &str) -> bool {
        password::verify_password(plaintext, hash)
    }

    /// Burns the same bcrypt work as a real verification and always fails.
    pub fn reject_unknown_account(&self, plaintext: &str) -> bool {
        password::verify_password(plaintext, &self.decoy_hash);
        false
    }

    pub fn issue_token(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, AppError> {
        self.tokens.issue(identity, now)
    }

    pub fn verify_token(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, InvalidToken> {
        self.tokens.verify(token, now)
    }
}

/// Represents the payload for a new account signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address for the new account.
    /// Must be a valid email format.
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    /// Password for the new account.
    /// At least 8 characters and at most 72 bytes, the most bcrypt will read.
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom = "validate_password_bytes"
    )]
    pub password: String,
    /// Optional display name; defaults to the local part of the email.
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > password::MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("password_too_long");
        error.message = Some("Password must be at most 72 bytes".into());
        return Err(error);
    }
    Ok(())
}

/// Represents the payload for a signin request.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response structure after successful signup or signin.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// The bearer token for subsequent requests.
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at,
            token,
        }
    }
}
