//! Defines the endpoint for adding a transaction to an account.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{
    Error,
    database_id::AccountId,
    extract::{Json, Path},
    ledger::Ledger,
    transaction::{NewTransaction, form::TransactionForm},
};

/// A route handler for adding a transaction to an account, responds with the
/// new transaction's ID.
pub async fn create_transaction_endpoint(
    State(ledger): State<Ledger>,
    Path(account_id): Path<AccountId>,
    Json(form): Json<TransactionForm>,
) -> Result<impl IntoResponse, Error> {
    let new_transaction = NewTransaction::try_from(form)?;

    let transaction = ledger
        .add_transaction(account_id, new_transaction)
        .inspect_err(|error| {
            tracing::warn!("Could not add transaction to account {account_id}: {error}");
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": transaction.id,
            "message": "Transaction added successfully",
        })),
    ))
}
