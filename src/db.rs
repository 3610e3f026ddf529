//! Traits for mapping the domain models onto the application's SQLite
//! database, plus the function that sets up the schema.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    stores::sqlite::{SqliteTransactionStore, SqliteUserStore},
};

/// A trait for adding a store's table to the database.
pub trait CreateTable {
    /// Create the table for the store's model.
    ///
    /// # Errors
    /// Returns an error if the table already exists or if there is an SQL
    /// error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping a `rusqlite::Row` to a concrete rust type.
///
/// Implementations expect the row to contain the table's columns in the order
/// they appear in the table definition.
pub trait MapRow {
    /// The type a row maps to.
    type ReturnType;

    /// Convert a row into [MapRow::ReturnType], reading from the first column.
    ///
    /// # Errors
    /// Returns an error if a column cannot be converted into the
    /// corresponding rust type.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into [MapRow::ReturnType], reading from the column at
    /// `offset`.
    ///
    /// The offset makes it possible to build several types from a single
    /// joined query.
    ///
    /// # Errors
    /// Returns an error if a column cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the application's tables and enable foreign key enforcement.
///
/// # Errors
/// Returns an error if the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    SqliteUserStore::create_table(connection)?;
    SqliteTransactionStore::create_table(connection)?;

    Ok(())
}
