use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable name of one account.
///
/// Issued tokens carry it as their subject claim and task records name their
/// owner with it. Comparison is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the identity back into an account id, if it is one.
    pub fn to_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.0).ok()
    }
}

impl From<Uuid> for Identity {
    fn from(id: Uuid) -> Self {
        Self(id.hyphenated().to_string())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_identity_is_lowercase_hyphenated() {
        let id = Uuid::parse_str("6F9619FF-8B86-D011-B42D-00C04FC964FF").unwrap();
        let identity = Identity::from(id);
        assert_eq!(identity.as_str(), "6f9619ff-8b86-d011-b42d-00c04fc964ff");
        assert_eq!(identity.to_uuid(), Some(id));
    }

    #[test]
    fn test_non_uuid_identity() {
        let identity = Identity::new("not-a-uuid");
        assert_eq!(identity.to_uuid(), None);
        assert_eq!(identity.to_string(), "not-a-uuid");
    }
}
