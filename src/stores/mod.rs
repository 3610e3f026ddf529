//! Traits and implementations for the objects that persist the domain
//! [models](crate::models).
//!
//! The traits are the seam between the HTTP handlers and the database: the
//! handlers only ever talk to a store, never to a connection.

mod transaction;
mod user;

pub mod sqlite;

pub use transaction::TransactionStore;
pub use user::UserStore;
