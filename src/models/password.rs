//! This file defines the types that handle password strength checking and
//! hashing. `ValidatedPassword` wraps a string that has passed the strength
//! check, and `PasswordHash` is its salted bcrypt hash.

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that has passed the strength check but has not been hashed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of a raw password string.
    ///
    /// # Errors
    /// Returns an [Error::TooWeak] if the password is too easy to guess. The
    /// error message explains what would make the password stronger.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, &[]);

        match analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => Err(Error::TooWeak(
                analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }

    /// Wrap a raw password string without checking its strength.
    ///
    /// The caller should make sure the password is secure. Despite the name
    /// this function is not `unsafe`: a weak password cannot affect memory
    /// safety, only account security.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The recommended cost for hashing passwords outside of tests.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a validated password with the given bcrypt `cost`.
    ///
    /// Higher costs increase the work needed to verify a password, for both
    /// the server and an attacker. Use [PasswordHash::DEFAULT_COST] unless
    /// you are writing a test.
    ///
    /// # Errors
    /// Returns an [Error::HashingError] if the underlying library fails.
    pub fn new(password: &ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a string that is already a bcrypt hash, e.g. from the database.
    pub fn new_unchecked(raw_hash: &str) -> Self {
        Self(raw_hash.to_owned())
    }

    /// Check whether `raw_password` matches this hash.
    ///
    /// # Errors
    /// Returns an [Error::HashingError] if the stored hash cannot be parsed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, models::ValidatedPassword};

    #[test]
    fn new_fails_on_empty_password() {
        assert!(matches!(ValidatedPassword::new(""), Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_fails_on_common_password() {
        assert!(matches!(
            ValidatedPassword::new("password1234"),
            Err(Error::TooWeak(_))
        ));
    }

    #[test]
    fn new_succeeds_on_strong_password() {
        assert!(ValidatedPassword::new("anunguessablepassphrase42").is_ok());
    }

    #[test]
    fn display_masks_the_password() {
        let password = ValidatedPassword::new_unchecked("hunter2");

        assert_eq!(password.to_string(), "********");
    }
}
