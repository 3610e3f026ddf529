//! This file defines a user of the application and its ID newtype.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::models::{DatabaseID, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This disambiguates user IDs from other integer IDs at compile time, e.g.
/// so that a transaction ID cannot be passed where a user ID is expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Wrap a raw database ID as a user ID.
    pub fn new(id: DatabaseID) -> Self {
        Self(id)
    }

    /// The underlying database ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
///
/// The password hash is intentionally excluded from serialization so it can
/// never leak into an HTTP response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserID,
    name: String,
    email: EmailAddress,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
}

impl User {
    /// Create a user from parts that have already been validated and stored,
    /// e.g. a database row.
    pub(crate) fn new_unchecked(
        id: UserID,
        name: String,
        email: EmailAddress,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The user's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The email address the user registered and logs in with.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

#[cfg(test)]
mod user_tests {
    use email_address::EmailAddress;

    use crate::models::{PasswordHash, User, UserID};

    #[test]
    fn user_does_not_serialize_password_hash() {
        let user = User::new_unchecked(
            UserID::new(1),
            "Alice".to_owned(),
            EmailAddress::new_unchecked("alice@example.com"),
            PasswordHash::new_unchecked("$2b$12$notarealhash"),
        );

        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["email"], "alice@example.com");
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("notarealhash"));
    }
}
