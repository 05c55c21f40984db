//! Defines the account model and the queries on the account table.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::AccountId, money::Amount};

/// A validated, non-empty account name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct AccountName(String);

impl AccountName {
    /// Create an account name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::Validation] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::Validation("account name cannot be empty".to_owned()))
        } else {
            Ok(Self(name.to_string()))
        }
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountName::new(s)
    }
}

impl Display for AccountName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bank account with a running balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The name of the account, e.g. "Checking".
    pub name: AccountName,
    /// The balance when the account was created.
    pub starting_balance: Amount,
    /// The starting balance plus the sum of the account's transactions.
    pub current_balance: Amount,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            starting_balance INTEGER NOT NULL,
            current_balance INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let starting_balance = row.get(2)?;
    let current_balance = row.get(3)?;

    Ok(Account {
        id,
        name: AccountName(raw_name),
        starting_balance,
        current_balance,
    })
}

/// Insert a new account whose current balance equals its starting balance.
///
/// # Errors
/// Returns an [Error::DuplicateAccountName] if an account with the same name
/// exists, or [Error::SqlError] for any other SQL error.
pub fn insert_account(
    name: AccountName,
    starting_balance: Amount,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .prepare(
            "INSERT INTO account (name, starting_balance, current_balance)
             VALUES (?1, ?2, ?2)
             RETURNING id, name, starting_balance, current_balance",
        )?
        .query_row(params![name.as_ref(), starting_balance], map_row_to_account)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateAccountName(name.to_string()),
            error => error.into(),
        })
}

/// Retrieve an account by its `id`.
///
/// # Errors
/// Returns [Error::AccountNotFound] if `id` does not refer to an account, or
/// [Error::SqlError] for any other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(
            "SELECT id, name, starting_balance, current_balance FROM account WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_row_to_account)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::AccountNotFound,
            error => error.into(),
        })
}

/// Check whether an account with `id` exists.
pub fn account_exists(id: AccountId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM account WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Get every account ordered by name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT id, name, starting_balance, current_balance FROM account ORDER BY name ASC",
        )?
        .query_map([], map_row_to_account)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

type RowsAffected = usize;

/// Change the cached balance of the account `id` by taking away `removed` and
/// adding `added`.
///
/// Callers must run this in the same SQL transaction as the change to the
/// account's transactions that the amounts account for.
///
/// Returns zero rows affected if there is no account `id`.
///
/// # Errors
/// Returns an [Error::Validation] if the new balance does not fit in the
/// range of representable amounts. The stored balance is left unchanged.
pub fn adjust_account_balance(
    id: AccountId,
    removed: Amount,
    added: Amount,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    // SQLite turns an overflowing integer sum into a REAL, so add in Rust.
    let current_balance: Option<Amount> = connection
        .query_row(
            "SELECT current_balance FROM account WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;

    let Some(current_balance) = current_balance else {
        return Ok(0);
    };

    connection
        .execute(
            "UPDATE account SET current_balance = ?1 WHERE id = ?2",
            params![current_balance.checked_replace(removed, added)?, id],
        )
        .map_err(Error::from)
}

/// Delete the account `id`, its transactions are removed by the foreign key cascade.
pub fn delete_account_row(id: AccountId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM account WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}
