//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User, UserID},
    stores::UserStore,
};

/// Stores users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SqliteUserStore {
    /// Create a new user in the database.
    ///
    /// # Errors
    /// Returns an [Error::DuplicateEmail] if `email` is already registered,
    /// or an [Error::SqlError] for any other SQL error.
    fn create(
        &mut self,
        name: String,
        email: EmailAddress,
        password_hash: PasswordHash,
    ) -> Result<User, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        connection.execute(
            "INSERT INTO user (name, email, password) VALUES (?1, ?2, ?3)",
            (&name, email.to_string(), password_hash.to_string()),
        )?;

        let id = UserID::new(connection.last_insert_rowid());

        Ok(User::new_unchecked(id, name, email, password_hash))
    }

    /// Get the user registered with `email`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if no such user exists, or an
    /// [Error::SqlError] for any other SQL error.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT id, name, email, password FROM user WHERE email = :email")?
            .query_row(&[(":email", &email.to_string())], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Get the user with the given `id`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if no such user exists, or an
    /// [Error::SqlError] for any other SQL error.
    fn get_by_id(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare("SELECT id, name, email, password FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|error| error.into())
    }
}

impl CreateTable for SqliteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    password TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = UserID::new(row.get(offset)?);
        let name = row.get(offset + 1)?;
        let raw_email: String = row.get(offset + 2)?;
        let raw_password_hash: String = row.get(offset + 3)?;

        Ok(User::new_unchecked(
            id,
            name,
            EmailAddress::new_unchecked(raw_email),
            PasswordHash::new_unchecked(&raw_password_hash),
        ))
    }
}
