//! Defines the endpoint for deleting a transaction.

use axum::extract::State;
use serde_json::{Value, json};

use crate::{
    Error,
    database_id::TransactionId,
    extract::{Json, Path},
    ledger::Ledger,
};

/// A route handler for deleting a transaction.
///
/// The transaction's amount is taken back out of the owning account's balance.
pub async fn delete_transaction_endpoint(
    State(ledger): State<Ledger>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Value>, Error> {
    ledger
        .delete_transaction(transaction_id)
        .inspect_err(|error| {
            tracing::warn!("Could not delete transaction {transaction_id}: {error}");
        })?;

    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        extract::Path,
        ledger::Ledger,
        money::Amount,
        transaction::{NewTransaction, delete_endpoint::delete_transaction_endpoint},
    };

    fn get_test_ledger() -> Ledger {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        Ledger::new(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn deleting_restores_balance() {
        let ledger = get_test_ledger();
        let account = ledger
            .create_account("Checking", Amount::from_cents(50000))
            .unwrap();
        let transaction = ledger
            .add_transaction(
                account.id,
                NewTransaction::new(date!(2024 - 01 - 05), Amount::from_cents(-4550)),
            )
            .unwrap();

        delete_transaction_endpoint(State(ledger.clone()), Path(transaction.id))
            .await
            .expect("could not delete transaction");

        assert_eq!(
            ledger.get_account(account.id).unwrap().current_balance,
            Amount::from_cents(50000)
        );
        assert_eq!(ledger.list_transactions(account.id), Ok(vec![]));
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let ledger = get_test_ledger();
        let account = ledger.create_account("Checking", Amount::ZERO).unwrap();
        let transaction = ledger
            .add_transaction(
                account.id,
                NewTransaction::new(date!(2024 - 01 - 05), Amount::from_cents(100)),
            )
            .unwrap();
        delete_transaction_endpoint(State(ledger.clone()), Path(transaction.id))
            .await
            .unwrap();

        let result = delete_transaction_endpoint(State(ledger.clone()), Path(transaction.id)).await;

        assert_eq!(
            result.map(|json| json.0),
            Err(Error::DeleteMissingTransaction)
        );
        assert_eq!(
            ledger.get_account(account.id).unwrap().current_balance,
            Amount::ZERO
        );
    }
}
