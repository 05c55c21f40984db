//! Defines the core data models and database queries for account transactions.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{AccountId, TransactionId},
    money::Amount,
};

// ============================================================================
// MODELS
// ============================================================================

/// An event where money entered or left an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the account that owns the transaction.
    pub account_id: AccountId,
    /// When the transaction happened.
    pub date: Date,
    /// Who the money was paid to or received from.
    pub vendor: Option<String>,
    /// The amount of money that entered (positive) or left (negative) the account.
    pub amount: Amount,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
}

/// The fields of a transaction that a user provides.
///
/// Used both to create a transaction and to replace the fields of an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// When the transaction happened.
    pub date: Date,
    /// Who the money was paid to or received from.
    pub vendor: Option<String>,
    /// The amount of money that entered (positive) or left (negative) the account.
    pub amount: Amount,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
}

impl NewTransaction {
    /// Create a new transaction with no vendor or description.
    pub fn new(date: Date, amount: Amount) -> Self {
        Self {
            date,
            vendor: None,
            amount,
            description: None,
        }
    }

    /// Set the vendor for the transaction.
    pub fn vendor(mut self, vendor: &str) -> Self {
        self.vendor = Some(vendor.to_owned());
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert a transaction for the account `account_id`.
///
/// This does not touch the account's balance, see [crate::Ledger::add_transaction].
pub fn insert_transaction(
    account_id: AccountId,
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO account_transaction (account_id, date, vendor, amount, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, account_id, date, vendor, amount, description",
        )?
        .query_row(
            params![
                account_id,
                transaction.date,
                transaction.vendor,
                transaction.amount,
                transaction.description,
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::AccountNotFound,
            error => error.into(),
        })
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, account_id, date, vendor, amount, description
             FROM account_transaction WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the transactions of an account, most recent first.
pub fn get_account_transactions(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, account_id, date, vendor, amount, description
             FROM account_transaction
             WHERE account_id = :account_id
             ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":account_id", &account_id)], map_transaction_row)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

type RowsAffected = usize;

/// Overwrite the user editable fields of the transaction `id`.
pub fn update_transaction_row(
    id: TransactionId,
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE account_transaction
            SET \
                date = ?1, \
                vendor = ?2, \
                amount = ?3, \
                description = ?4 \
            WHERE id = ?5;",
            params![
                transaction.date,
                transaction.vendor,
                transaction.amount,
                transaction.description,
                id,
            ],
        )
        .map_err(Error::from)
}

pub fn delete_transaction_row(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM account_transaction WHERE id = :id",
            &[(":id", &id)],
        )
        .map_err(Error::from)
}

/// Sum the amounts of every transaction belonging to `account_id`.
pub fn sum_account_transactions(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Amount, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM account_transaction WHERE account_id = ?1",
            [account_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account_transaction (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                vendor TEXT,
                amount INTEGER NOT NULL,
                description TEXT,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_account_transaction_account_date
         ON account_transaction(account_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let account_id = row.get(1)?;
    let date = row.get(2)?;
    let vendor = row.get(3)?;
    let amount = row.get(4)?;
    let description = row.get(5)?;

    Ok(Transaction {
        id,
        account_id,
        date,
        vendor,
        amount,
        description,
    })
}

// ============================================================================
// TESTS
// ============================================================================
