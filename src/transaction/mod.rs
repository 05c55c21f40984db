//! Transactions recorded against bank accounts.
//!
//! This module contains the `Transaction` model, the database functions for
//! storing and querying transactions, and the route handlers that expose the
//! [crate::Ledger] operations on transactions.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;

pub use core::{
    NewTransaction, Transaction, create_transaction_table, delete_transaction_row,
    get_account_transactions, get_transaction, insert_transaction,
    sum_account_transactions, update_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
