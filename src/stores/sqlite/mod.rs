//! SQLite backed implementations of the store traits.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize};

mod transaction;
mod user;

pub use transaction::SqliteTransactionStore;
pub use user::SqliteUserStore;

/// The application state wired up with the SQLite stores.
pub type SqliteAppState = AppState<SqliteTransactionStore, SqliteUserStore>;

/// Create an [AppState] with SQLite stores sharing `connection`.
///
/// This function initializes the database by adding the tables for the
/// domain models if they do not exist yet.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(
    connection: Connection,
    cookie_secret: &str,
) -> Result<SqliteAppState, Error> {
    initialize(&connection)?;

    let connection = Arc::new(Mutex::new(connection));

    Ok(AppState::new(
        cookie_secret,
        SqliteTransactionStore::new(connection.clone()),
        SqliteUserStore::new(connection),
    ))
}
