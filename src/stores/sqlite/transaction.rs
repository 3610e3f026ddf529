//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewTransaction, Transaction, UserID},
    stores::TransactionStore,
};

/// Stores transactions in a SQLite database.
///
/// Transactions reference the [User](crate::models::User) model, so the user
/// table must be set up in the same database.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SqliteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// The ID and creation time are assigned here.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an unexpected SQL error, e.g.
    /// `user_id` does not refer to a valid user.
    fn create(
        &mut self,
        user_id: UserID,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let created_at = OffsetDateTime::now_utc();

        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let transaction = connection
            .prepare(
                "INSERT INTO \"transaction\" (amount, description, kind, date, created_at, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, amount, description, kind, date, created_at, user_id",
            )?
            .query_row(
                (
                    transaction.amount,
                    &transaction.description,
                    transaction.kind,
                    transaction.date,
                    created_at,
                    user_id.as_i64(),
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve the transactions owned by `user_id`, most recent date first.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn for_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, amount, description, kind, date, created_at, user_id
                 FROM \"transaction\"
                 WHERE user_id = :user_id
                 ORDER BY date DESC, id DESC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }
}

impl CreateTable for SqliteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    amount REAL NOT NULL,
                    description TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    date TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    user_id INTEGER NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let amount = row.get(offset + 1)?;
        let description = row.get(offset + 2)?;
        let kind = row.get(offset + 3)?;
        let date = row.get(offset + 4)?;
        let created_at = row.get(offset + 5)?;
        let user_id = UserID::new(row.get(offset + 6)?);

        Ok(Transaction::new_unchecked(
            id,
            amount,
            description,
            kind,
            date,
            created_at,
            user_id,
        ))
    }
}

#[cfg(test)]
mod sqlite_transaction_store_tests {
    use email_address::EmailAddress;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        models::{NewTransaction, PasswordHash, TransactionKind, UserID},
        stores::{TransactionStore, UserStore, sqlite::SqliteAppState, sqlite::create_app_state},
    };

    fn get_app_state() -> SqliteAppState {
        let connection = Connection::open_in_memory().unwrap();
        create_app_state(connection, "stneaoetse").unwrap()
    }

    fn create_user(state: &mut SqliteAppState, email: &str) -> UserID {
        state
            .user_store
            .create(
                "Test User".to_owned(),
                email.parse::<EmailAddress>().unwrap(),
                PasswordHash::new_unchecked("$2b$12$notarealhash"),
            )
            .unwrap()
            .id()
    }

    fn coffee_expense(day: u8) -> NewTransaction {
        NewTransaction {
            amount: 42.50,
            description: "Coffee".to_owned(),
            kind: TransactionKind::Expense,
            date: date!(2025 - 01 - 01).replace_day(day).unwrap(),
        }
    }

    #[test]
    fn create_assigns_id_and_keeps_fields() {
        let mut state = get_app_state();
        let user_id = create_user(&mut state, "test@test.com");

        let transaction = state
            .transaction_store
            .create(user_id, coffee_expense(15))
            .unwrap();

        assert!(transaction.id() > 0);
        assert_eq!(transaction.amount(), 42.50);
        assert_eq!(transaction.description(), "Coffee");
        assert_eq!(transaction.kind(), TransactionKind::Expense);
        assert_eq!(*transaction.date(), date!(2025 - 01 - 15));
        assert_eq!(transaction.user_id(), user_id);
    }

    #[test]
    fn create_fails_on_invalid_user_id() {
        let mut state = get_app_state();

        let result = state
            .transaction_store
            .create(UserID::new(999), coffee_expense(15));

        assert!(result.is_err());
    }

    #[test]
    fn for_user_returns_empty_vec_for_new_user() {
        let mut state = get_app_state();
        let user_id = create_user(&mut state, "test@test.com");

        let transactions = state.transaction_store.for_user(user_id).unwrap();

        assert_eq!(transactions, vec![]);
    }

    #[test]
    fn for_user_sorts_by_descending_date() {
        let mut state = get_app_state();
        let user_id = create_user(&mut state, "test@test.com");

        let mut want = vec![
            state
                .transaction_store
                .create(user_id, coffee_expense(3))
                .unwrap(),
            state
                .transaction_store
                .create(user_id, coffee_expense(27))
                .unwrap(),
            state
                .transaction_store
                .create(user_id, coffee_expense(14))
                .unwrap(),
        ];
        want.sort_by(|a, b| b.date().cmp(a.date()));

        let got = state.transaction_store.for_user(user_id).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn for_user_breaks_date_ties_by_descending_id() {
        let mut state = get_app_state();
        let user_id = create_user(&mut state, "test@test.com");

        let first = state
            .transaction_store
            .create(user_id, coffee_expense(15))
            .unwrap();
        let second = state
            .transaction_store
            .create(user_id, coffee_expense(15))
            .unwrap();

        let got = state.transaction_store.for_user(user_id).unwrap();

        assert_eq!(got, vec![second, first]);
    }

    #[test]
    fn for_user_does_not_return_other_users_transactions() {
        let mut state = get_app_state();
        let owner = create_user(&mut state, "owner@test.com");
        let other = create_user(&mut state, "other@test.com");

        state
            .transaction_store
            .create(owner, coffee_expense(15))
            .unwrap();

        let transactions = state.transaction_store.for_user(other).unwrap();

        assert_eq!(transactions, vec![]);
    }
}
