//! Defines the endpoint for creating a new account.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{Error, extract::Json, ledger::Ledger, money::Amount};

/// The request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    /// The account name, e.g. "Checking".
    #[serde(default)]
    pub name: String,
    /// The balance in dollars at the time the account is added, zero if absent.
    #[serde(default)]
    pub starting_balance: Option<Amount>,
}

/// A route handler for creating a new account, responds with the new account's ID.
pub async fn create_account_endpoint(
    State(ledger): State<Ledger>,
    Json(form): Json<AccountForm>,
) -> Result<impl IntoResponse, Error> {
    let starting_balance = form.starting_balance.unwrap_or(Amount::ZERO);

    let account = ledger
        .create_account(&form.name, starting_balance)
        .inspect_err(|error| {
            tracing::warn!("Could not create account with {form:?}: {error}");
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": account.id,
            "message": "Account created successfully",
        })),
    ))
}
