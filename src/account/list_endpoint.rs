//! Defines the endpoint for listing accounts with their balances.

use axum::extract::State;

use crate::{Error, account::Account, extract::Json, ledger::Ledger};

/// A route handler that responds with every account and its current balance.
pub async fn list_accounts_endpoint(
    State(ledger): State<Ledger>,
) -> Result<Json<Vec<Account>>, Error> {
    ledger.list_accounts().map(Json)
}
