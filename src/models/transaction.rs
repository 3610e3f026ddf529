//! This file defines the type `Transaction`, the core type of the application,
//! along with the payload type and validation for creating new transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// The format that transaction dates are submitted in, e.g. "2025-01-15".
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// The maximum number of characters allowed in a transaction description.
const DESCRIPTION_MAX_LENGTH: usize = 255;

/// Whether a transaction brings money in or takes money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. a grocery shop.
    Expense,
}

impl TransactionKind {
    /// The wire representation of the kind, as used in JSON and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ();

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string {
            "INCOME" => Ok(TransactionKind::Income),
            "EXPENSE" => Ok(TransactionKind::Expense),
            _ => Err(()),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// An income or expense belonging to a user.
///
/// To create a new `Transaction`, validate a [CreateTransactionPayload] and
/// pass the result to [TransactionStore::create](crate::stores::TransactionStore::create).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: DatabaseID,
    amount: f64,
    description: String,
    #[serde(rename = "type")]
    kind: TransactionKind,
    date: Date,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    user_id: UserID,
}

impl Transaction {
    /// Create a transaction from parts that have already been validated and
    /// stored, e.g. a database row.
    pub(crate) fn new_unchecked(
        id: DatabaseID,
        amount: f64,
        description: String,
        kind: TransactionKind,
        date: Date,
        created_at: OffsetDateTime,
        user_id: UserID,
    ) -> Self {
        Self {
            id,
            amount,
            description,
            kind,
            date,
            created_at,
            user_id,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The amount of money earned or spent. Always greater than zero, the
    /// direction is given by [Transaction::kind].
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// A text description of what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the transaction is an income or an expense.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// When the transaction happened, as reported by the user.
    pub fn date(&self) -> &Date {
        &self.date
    }

    /// When the transaction was recorded on the server.
    pub fn created_at(&self) -> &OffsetDateTime {
        &self.created_at
    }

    /// The ID of the user that owns this transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }
}

/// A transaction that has passed validation but has not been stored yet.
///
/// The ID, creation time and owner are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money earned or spent. Strictly greater than zero.
    pub amount: f64,
    /// A non-empty description of at most 255 characters.
    pub description: String,
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
    /// When the transaction happened.
    pub date: Date,
}

/// The raw, untyped body of a create transaction request.
///
/// All fields arrive as strings from the client form and are checked and
/// coerced by [CreateTransactionPayload::validate].
#[derive(Debug, Deserialize)]
pub struct CreateTransactionPayload {
    /// The transaction amount as entered into the form.
    pub amount: String,
    /// The transaction description as entered into the form.
    pub description: String,
    /// Should be "INCOME" or "EXPENSE".
    #[serde(rename = "type")]
    pub kind: String,
    /// The transaction date as "[year]-[month]-[day]".
    pub date: String,
}

impl CreateTransactionPayload {
    /// Check and coerce the raw payload into a [NewTransaction].
    ///
    /// This is a pure function: it touches neither the store nor the session.
    ///
    /// # Errors
    /// Returns an [Error::InvalidField] naming the first field that failed
    /// validation:
    /// - `amount` must parse as a finite number strictly greater than zero,
    /// - `description` must be between 1 and 255 characters,
    /// - `type` must be exactly "INCOME" or "EXPENSE",
    /// - `date` must be a valid calendar date such as "2025-01-15".
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let amount = self
            .amount
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
            .ok_or_else(|| Error::InvalidField {
                field: "amount",
                message: "Amount must be a positive number".to_owned(),
            })?;

        let description_length = self.description.chars().count();

        if description_length == 0 {
            return Err(Error::InvalidField {
                field: "description",
                message: "Description is required".to_owned(),
            });
        }

        if description_length > DESCRIPTION_MAX_LENGTH {
            return Err(Error::InvalidField {
                field: "description",
                message: format!("Description must be at most {DESCRIPTION_MAX_LENGTH} characters"),
            });
        }

        let kind = self.kind.parse().map_err(|_| Error::InvalidField {
            field: "type",
            message: "Type must be either INCOME or EXPENSE".to_owned(),
        })?;

        let date = Date::parse(&self.date, DATE_FORMAT).map_err(|_| Error::InvalidField {
            field: "date",
            message: "Invalid date format".to_owned(),
        })?;

        Ok(NewTransaction {
            amount,
            description: self.description,
            kind,
            date,
        })
    }
}


#[cfg(test)]
mod serde_tests {
    use time::macros::{date, datetime};

    use crate::models::{Transaction, TransactionKind, UserID};

    #[test]
    fn transaction_serializes_with_wire_field_names() {
        let transaction = Transaction::new_unchecked(
            1,
            42.50,
            "Coffee".to_owned(),
            TransactionKind::Expense,
            date!(2025 - 01 - 15),
            datetime!(2025-01-15 10:30:00 UTC),
            UserID::new(7),
        );

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["amount"], 42.50);
        assert_eq!(json["description"], "Coffee");
        assert_eq!(json["type"], "EXPENSE");
        assert_eq!(json["date"], "2025-01-15");
        assert_eq!(json["createdAt"], "2025-01-15T10:30:00Z");
        assert_eq!(json["userId"], 7);
    }

    #[test]
    fn transaction_kind_round_trips_through_strings() {
        for (kind, string) in [
            (TransactionKind::Income, "INCOME"),
            (TransactionKind::Expense, "EXPENSE"),
        ] {
            assert_eq!(kind.to_string(), string);
            assert_eq!(string.parse::<TransactionKind>(), Ok(kind));
        }
    }
}
