//! Defines the endpoint for deleting an account.

use axum::extract::State;
use serde_json::{Value, json};

use crate::{
    Error,
    database_id::AccountId,
    extract::{Json, Path},
    ledger::Ledger,
};

/// A route handler for deleting an account and all of its transactions.
pub async fn delete_account_endpoint(
    State(ledger): State<Ledger>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Value>, Error> {
    ledger.delete_account(account_id).inspect_err(|error| {
        tracing::warn!("Could not delete account {account_id}: {error}");
    })?;

    Ok(Json(json!({ "message": "Account deleted successfully" })))
}
