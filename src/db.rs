//! Creates the database schema.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    account::create_account_table,
    auth::create_user_table,
    budget::create_expense_target_table,
    credit_card::create_credit_card_table,
    expense::create_individual_expense_table,
    journal::create_journal_table,
    subscription::create_subscription_table,
    transaction::create_transaction_table,
};

/// Create the tables for every domain model if they do not exist yet and turn
/// on foreign key enforcement for `connection`.
///
/// Foreign keys must be on for deleting an account to also delete its
/// transactions.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // This pragma is a no-op inside a transaction.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_account_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_expense_target_table(&transaction)?;
    create_individual_expense_table(&transaction)?;
    create_journal_table(&transaction)?;
    create_credit_card_table(&transaction)?;
    create_subscription_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the shared database connection.
///
/// # Errors
/// Returns an [Error::DatabaseLockError] if the mutex is poisoned.
pub fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}
