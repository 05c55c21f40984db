//! Ledgerbook is a web service for tracking personal finances.
//!
//! This library provides a JSON REST API for bank account ledgers, budgets,
//! expenses, credit cards, subscriptions and a journal.
//!
//! The heart of the crate is the [Ledger], which keeps every account's cached
//! balance equal to its starting balance plus the sum of its transactions.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod account;
mod app_state;
mod auth;
mod budget;
mod credit_card;
mod database_id;
mod db;
mod endpoints;
mod error;
mod expense;
mod extract;
mod form;
mod journal;
mod ledger;
mod logging;
mod money;
mod not_found;
mod routing;
mod subscription;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use account::{Account, AccountName};
pub use app_state::AppState;
pub use auth::{
    DEFAULT_COOKIE_DURATION, PasswordHash, User, UserID, ValidatedPassword, create_user,
    is_authenticated,
};
pub use database_id::{AccountId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use ledger::Ledger;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::Amount;
pub use routing::build_router;
pub use transaction::{NewTransaction, Transaction};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the ctrl+c signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
