//! Defines the transaction store trait.

use crate::{
    Error,
    models::{NewTransaction, Transaction, UserID},
};

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore {
    /// Persist a validated transaction owned by `user_id`.
    ///
    /// The store assigns the ID and creation time.
    fn create(
        &mut self,
        user_id: UserID,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error>;

    /// Retrieve all of `user_id`'s transactions, most recent date first.
    ///
    /// Ties on the date are broken by descending ID so that repeated calls
    /// return the same order. Returns an empty vector for a user with no
    /// transactions.
    fn for_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;
}
