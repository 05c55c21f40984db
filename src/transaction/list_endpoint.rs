//! Defines the endpoint for listing an account's transactions.

use axum::extract::State;

use crate::{
    Error,
    database_id::AccountId,
    extract::{Json, Path},
    ledger::Ledger,
    transaction::Transaction,
};

/// A route handler that responds with an account's transactions, most recent first.
pub async fn list_transactions_endpoint(
    State(ledger): State<Ledger>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Vec<Transaction>>, Error> {
    ledger.list_transactions(account_id).map(Json)
}
