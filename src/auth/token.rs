use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::auth::identity::Identity;
use crate::config::AuthConfig;
use crate::error::AppError;

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the account's identity.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// The only failure `TokenCodec::verify` reports.
///
/// Bad signatures, malformed payloads, missing subjects and expired tokens all
/// look the same to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid token")]
pub struct InvalidToken;

/// Signs and verifies access tokens with the process-wide HMAC secret.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(config.algorithm());
        // Expiry is checked against the caller's clock in `verify`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            algorithm: config.algorithm(),
            encoding_key: EncodingKey::from_secret(config.secret()),
            decoding_key: DecodingKey::from_secret(config.secret()),
            validation,
            ttl: config.token_ttl(),
        }
    }

    /// Issues a token for `identity` that expires `ttl` after `now`.
    pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, AppError> {
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::InternalServerError("Token expiry is out of range".into())
        })?;
        let claims = Claims {
            sub: identity.as_str().to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Returns the subject of `token` if its signature checks out and `now` is
    /// strictly before its expiry.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, InvalidToken> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected access token: {:?}", e.kind());
                InvalidToken
            })?;

        if now.timestamp() >= claims.exp {
            debug!("Rejected access token: expired");
            return Err(InvalidToken);
        }
        if claims.sub.is_empty() {
            debug!("Rejected access token: empty subject");
            return Err(InvalidToken);
        }

        Ok(Identity::new(claims.sub))
    }
}
