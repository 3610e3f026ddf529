//! The transaction endpoints: listing the logged in user's transactions and
//! recording new ones.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    Error,
    app_state::TransactionState,
    models::{CreateTransactionPayload, Transaction, UserID},
    stores::TransactionStore,
};

/// Handler for listing the logged in user's transactions.
///
/// Transactions are returned most recent date first. Listing twice without
/// an intervening create returns identical results.
pub async fn get_transactions<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    T: TransactionStore,
{
    state.transaction_store.for_user(user_id).map(Json)
}

/// Handler for recording a new transaction.
///
/// The raw payload is validated before anything touches the store; the
/// created record is returned with status 201.
///
/// # Errors
/// Returns an [Error::InvalidField] naming the offending field if the
/// payload fails validation.
pub async fn create_transaction<T>(
    State(mut state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    T: TransactionStore,
{
    let new_transaction = payload.validate()?;

    let transaction = state.transaction_store.create(user_id, new_transaction)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
