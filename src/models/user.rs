use std::fmt;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::Identity;

/// An account as stored by the persistence layer.
///
/// Never serialized directly; responses go through `AuthResponse`.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity::from(self.id)
    }
}

// Hand-written so the password hash can never end up in a log line.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Everything needed to insert a new account.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl NewUser {
    /// Falls back to the local part of the email when no name was given.
    pub fn new(email: String, name: Option<String>, password_hash: String) -> Self {
        let name = name.unwrap_or_else(|| {
            email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        });
        Self {
            email,
            name,
            password_hash,
        }
    }
}
