use crate::error::AppError;
use bcrypt::{hash, verify};
use log::debug;

/// bcrypt ignores everything past this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hashes `password` with bcrypt at the given cost. Every call draws a fresh salt,
/// so two hashes of the same password never compare equal.
///
/// Passwords longer than `MAX_PASSWORD_BYTES` are refused rather than truncated.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::ValidationError(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt hash.
///
/// A malformed hash is a mismatch, not an error. So is a password longer than
/// `MAX_PASSWORD_BYTES`, since no stored hash can have been made from it.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    if password.len() > MAX_PASSWORD_BYTES {
        debug!("Rejected password longer than {} bytes", MAX_PASSWORD_BYTES);
        return false;
    }
    match verify(password, hashed_password) {
        Ok(matches) => matches,
        Err(e) => {
            debug!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}
