//! Defines the endpoint for editing a transaction.

use axum::extract::State;
use serde_json::{Value, json};

use crate::{
    Error,
    database_id::TransactionId,
    extract::{Json, Path},
    ledger::Ledger,
    transaction::{NewTransaction, form::TransactionForm},
};

/// A route handler for replacing the fields of a transaction.
///
/// The owning account's balance moves by the change in the transaction's amount.
pub async fn edit_transaction_endpoint(
    State(ledger): State<Ledger>,
    Path(transaction_id): Path<TransactionId>,
    Json(form): Json<TransactionForm>,
) -> Result<Json<Value>, Error> {
    let fields = NewTransaction::try_from(form)?;

    ledger
        .update_transaction(transaction_id, fields)
        .inspect_err(|error| {
            tracing::warn!("Could not update transaction {transaction_id}: {error}");
        })?;

    Ok(Json(json!({ "message": "Transaction updated successfully" })))
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, initialize_db,
        extract::{Json, Path},
        ledger::Ledger,
        money::Amount,
        transaction::{
            NewTransaction, Transaction, edit_endpoint::edit_transaction_endpoint,
            form::TransactionForm,
        },
    };

    fn must_create_test_ledger() -> Ledger {
        let connection =
            Connection::open_in_memory().expect("could not create in-memory SQLite database");
        initialize_db(&connection).expect("could not initialize test DB");

        Ledger::new(Arc::new(Mutex::new(connection)))
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let ledger = must_create_test_ledger();
        let account = ledger
            .create_account("Checking", Amount::from_cents(50000))
            .unwrap();
        let transaction = ledger
            .add_transaction(
                account.id,
                NewTransaction::new(date!(2025 - 10 - 27), Amount::from_cents(-4550)),
            )
            .unwrap();
        let want_transaction = Transaction {
            id: transaction.id,
            account_id: account.id,
            date: date!(2025 - 10 - 28),
            vendor: Some("Grocer".to_owned()),
            amount: Amount::from_cents(-10000),
            description: Some("weekly shop".to_owned()),
        };
        let form = TransactionForm {
            date: Some(want_transaction.date),
            vendor: want_transaction.vendor.clone(),
            amount: Some(want_transaction.amount),
            description: want_transaction.description.clone(),
        };

        edit_transaction_endpoint(State(ledger.clone()), Path(transaction.id), Json(form))
            .await
            .expect("could not update transaction");

        assert_eq!(
            ledger.list_transactions(account.id).unwrap(),
            vec![want_transaction]
        );
        assert_eq!(
            ledger.get_account(account.id).unwrap().current_balance,
            Amount::from_cents(40000)
        );
    }

    #[tokio::test]
    async fn updating_missing_transaction_is_not_found() {
        let ledger = must_create_test_ledger();
        let form = TransactionForm {
            date: Some(date!(2025 - 10 - 28)),
            amount: Some(Amount::from_cents(1)),
            ..Default::default()
        };

        let result = edit_transaction_endpoint(State(ledger), Path(12), Json(form)).await;

        assert!(matches!(result, Err(Error::UpdateMissingTransaction)));
    }
}
