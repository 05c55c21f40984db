//! The ledger service keeps each account's cached balance in step with its transactions.
//!
//! Every operation that changes a transaction also changes the owning
//! account's `current_balance`, and both writes happen inside one
//! `BEGIN IMMEDIATE` SQLite transaction on a connection that is held behind a
//! mutex. So after any operation completes, every account satisfies
//!
//! ```text
//! current_balance == starting_balance + sum(transaction.amount)
//! ```
//!
//! and concurrent changes to the same account cannot lose an update.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, TransactionBehavior};

use crate::{
    Error,
    account::{
        Account, AccountName, account_exists, adjust_account_balance, delete_account_row,
        get_account, get_all_accounts, insert_account,
    },
    database_id::{AccountId, TransactionId},
    db::lock_connection,
    money::Amount,
    transaction::{
        NewTransaction, Transaction, delete_transaction_row, get_account_transactions,
        get_transaction, insert_transaction, update_transaction_row,
    },
};

/// Creates, lists, edits and deletes accounts and their transactions.
#[derive(Debug, Clone)]
pub struct Ledger {
    db_connection: Arc<Mutex<Connection>>,
}

impl Ledger {
    /// Create a ledger that reads and writes through `db_connection`.
    ///
    /// The database must already have been initialized with [crate::initialize_db].
    pub fn new(db_connection: Arc<Mutex<Connection>>) -> Self {
        Self { db_connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        lock_connection(&self.db_connection)
    }

    /// Run `operation` inside an immediate SQL transaction.
    ///
    /// The SQL transaction is committed only if `operation` succeeds, otherwise
    /// it is rolled back when dropped.
    fn write<T>(
        &self,
        operation: impl FnOnce(&Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut connection = self.lock()?;
        let sql_transaction =
            connection.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = operation(&sql_transaction)?;
        sql_transaction.commit()?;

        Ok(result)
    }

    /// Create an account whose current balance is `starting_balance`.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if `name` is blank, or an
    /// [Error::DuplicateAccountName] if the name is already in use.
    pub fn create_account(&self, name: &str, starting_balance: Amount) -> Result<Account, Error> {
        let name = AccountName::new(name)?;

        let account = self.write(|connection| insert_account(name, starting_balance, connection))?;
        tracing::info!(
            "Created account {} \"{}\" with starting balance {}",
            account.id,
            account.name,
            account.starting_balance
        );

        Ok(account)
    }

    /// Get a single account.
    ///
    /// # Errors
    /// Returns [Error::AccountNotFound] if `account_id` does not refer to an account.
    pub fn get_account(&self, account_id: AccountId) -> Result<Account, Error> {
        get_account(account_id, &*self.lock()?)
    }

    /// Get every account with its current balance, ordered by name.
    pub fn list_accounts(&self) -> Result<Vec<Account>, Error> {
        get_all_accounts(&*self.lock()?)
    }

    /// Delete an account and all of its transactions.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingAccount] if `account_id` does not refer to
    /// an account, including one that has already been deleted.
    pub fn delete_account(&self, account_id: AccountId) -> Result<(), Error> {
        self.write(|connection| match delete_account_row(account_id, connection)? {
            0 => Err(Error::DeleteMissingAccount),
            _ => Ok(()),
        })?;
        tracing::info!("Deleted account {account_id}");

        Ok(())
    }

    /// Record a transaction against an account and add its amount to the
    /// account's balance.
    ///
    /// # Errors
    /// Returns [Error::AccountNotFound] if `account_id` does not refer to an account.
    pub fn add_transaction(
        &self,
        account_id: AccountId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        self.write(|connection| {
            let transaction = insert_transaction(account_id, &new_transaction, connection)?;

            let rows_affected =
                adjust_account_balance(account_id, Amount::ZERO, transaction.amount, connection)?;

            match rows_affected {
                0 => Err(Error::AccountNotFound),
                _ => Ok(transaction),
            }
        })
    }

    /// Replace the fields of a transaction and move the owning account's
    /// balance by the difference between the new and old amounts.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if `transaction_id` does not
    /// refer to a transaction.
    pub fn update_transaction(
        &self,
        transaction_id: TransactionId,
        fields: NewTransaction,
    ) -> Result<Transaction, Error> {
        self.write(|connection| {
            let old = get_transaction(transaction_id, connection).map_err(|error| match error {
                Error::NotFound => Error::UpdateMissingTransaction,
                error => error,
            })?;
            update_transaction_row(transaction_id, &fields, connection)?;
            adjust_account_balance(old.account_id, old.amount, fields.amount, connection)?;

            Ok(Transaction {
                id: old.id,
                account_id: old.account_id,
                date: fields.date,
                vendor: fields.vendor,
                amount: fields.amount,
                description: fields.description,
            })
        })
    }

    /// Delete a transaction and subtract its amount from the owning account's balance.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if `transaction_id` does not
    /// refer to a transaction, including one that has already been deleted.
    pub fn delete_transaction(&self, transaction_id: TransactionId) -> Result<(), Error> {
        self.write(|connection| {
            let old = get_transaction(transaction_id, connection).map_err(|error| match error {
                Error::NotFound => Error::DeleteMissingTransaction,
                error => error,
            })?;

            delete_transaction_row(transaction_id, connection)?;
            adjust_account_balance(old.account_id, old.amount, Amount::ZERO, connection)?;

            Ok(())
        })
    }

    /// Get the transactions of an account, most recent first.
    ///
    /// # Errors
    /// Returns [Error::AccountNotFound] if `account_id` does not refer to an account.
    pub fn list_transactions(&self, account_id: AccountId) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        if !account_exists(account_id, &connection)? {
            return Err(Error::AccountNotFound);
        }

        get_account_transactions(account_id, &connection)
    }
}
