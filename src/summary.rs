//! Aggregation of a user's transactions into total income, total expenses
//! and net balance, and the endpoint that serves the result.

use axum::{Extension, Json, extract::State};
use serde::Serialize;

use crate::{
    Error,
    app_state::TransactionState,
    models::{Transaction, TransactionKind, UserID},
    stores::TransactionStore,
};

/// The aggregate totals of a list of transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    total_income: f64,
    total_expenses: f64,
    net_balance: f64,
}

impl Summary {
    /// Compute the totals from scratch by a single pass over `transactions`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut total_income = 0.0;
        let mut total_expenses = 0.0;

        for transaction in transactions {
            match transaction.kind() {
                TransactionKind::Income => total_income += transaction.amount(),
                TransactionKind::Expense => total_expenses += transaction.amount(),
            }
        }

        Self {
            total_income,
            total_expenses,
            net_balance: total_income - total_expenses,
        }
    }

    /// The sum of all income amounts.
    pub fn total_income(&self) -> f64 {
        self.total_income
    }

    /// The sum of all expense amounts.
    pub fn total_expenses(&self) -> f64 {
        self.total_expenses
    }

    /// Total income minus total expenses. Negative when the user spent more
    /// than they earned.
    pub fn net_balance(&self) -> f64 {
        self.net_balance
    }
}

/// The totals formatted for display, e.g. "$1234.50".
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDisplay {
    total_income: String,
    total_expenses: String,
    net_balance: String,
}

/// The body of a summary response: the raw totals plus display strings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(flatten)]
    summary: Summary,
    display: SummaryDisplay,
}

impl From<Summary> for SummaryResponse {
    fn from(summary: Summary) -> Self {
        let display = SummaryDisplay {
            total_income: format_usd(summary.total_income()),
            total_expenses: format_usd(summary.total_expenses()),
            net_balance: format_usd(summary.net_balance()),
        };

        Self { summary, display }
    }
}

/// Format an amount as dollars with two decimal places, e.g. "$42.50".
///
/// Negative amounts put the sign before the dollar symbol: "-$7.50".
pub fn format_usd(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${amount:.2}")
    }
}

/// Handler for summarizing the logged in user's transactions.
///
/// The totals are recomputed from the full transaction list on every call;
/// nothing is cached.
pub async fn get_summary<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<SummaryResponse>, Error>
where
    T: TransactionStore,
{
    let transactions = state.transaction_store.for_user(user_id)?;

    Ok(Json(Summary::from_transactions(&transactions).into()))
}

#[cfg(test)]
mod summary_tests {
    use time::macros::{date, datetime};

    use crate::models::{Transaction, TransactionKind, UserID};

    use super::{Summary, format_usd};

    fn transaction(amount: f64, kind: TransactionKind) -> Transaction {
        Transaction::new_unchecked(
            1,
            amount,
            "test".to_owned(),
            kind,
            date!(2025 - 01 - 15),
            datetime!(2025-01-15 10:30:00 UTC),
            UserID::new(1),
        )
    }

    #[test]
    fn summary_splits_income_and_expenses() {
        let transactions = vec![
            transaction(100.0, TransactionKind::Income),
            transaction(30.0, TransactionKind::Expense),
            transaction(20.0, TransactionKind::Expense),
        ];

        let summary = Summary::from_transactions(&transactions);

        assert_eq!(summary.total_income(), 100.0);
        assert_eq!(summary.total_expenses(), 50.0);
        assert_eq!(summary.net_balance(), 50.0);
    }

    #[test]
    fn summary_of_no_transactions_is_zero() {
        let summary = Summary::from_transactions(&[]);

        assert_eq!(summary.total_income(), 0.0);
        assert_eq!(summary.total_expenses(), 0.0);
        assert_eq!(summary.net_balance(), 0.0);
    }

    #[test]
    fn net_balance_goes_negative_when_expenses_exceed_income() {
        let transactions = vec![
            transaction(10.0, TransactionKind::Income),
            transaction(17.5, TransactionKind::Expense),
        ];

        let summary = Summary::from_transactions(&transactions);

        assert_eq!(summary.net_balance(), -7.5);
    }

    #[test]
    fn format_usd_uses_two_decimal_places() {
        assert_eq!(format_usd(42.5), "$42.50");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(1234.0), "$1234.00");
    }

    #[test]
    fn format_usd_puts_the_sign_before_the_dollar_symbol() {
        assert_eq!(format_usd(-7.5), "-$7.50");
    }
}
