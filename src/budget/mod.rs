//! Budget targets per expense category, and the summary of budgeted versus
//! actual spending.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod endpoints;
mod summary;

pub use core::create_expense_target_table;
pub use endpoints::{list_expense_targets_endpoint, save_expense_targets_endpoint};
pub use summary::get_budget_summary;

/// The state needed by the budget route handlers.
#[derive(Debug, Clone)]
pub struct BudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
