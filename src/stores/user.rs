//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{PasswordHash, User, UserID},
};

/// Handles the creation and retrieval of users.
pub trait UserStore {
    /// Persist a new user. The store assigns the ID.
    ///
    /// # Errors
    /// Returns an [Error::DuplicateEmail] if a user with `email` already
    /// exists.
    fn create(
        &mut self,
        name: String,
        email: EmailAddress,
        password_hash: PasswordHash,
    ) -> Result<User, Error>;

    /// Retrieve the user registered with `email`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if no user has registered with `email`.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;

    /// Retrieve the user with the given ID.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a user.
    fn get_by_id(&self, id: UserID) -> Result<User, Error>;
}
