//! Compares the budgeted amount for each subcategory with what was actually spent.

use std::collections::BTreeMap;

use axum::extract::State;
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    budget::{BudgetState, core::list_expense_targets},
    db::lock_connection,
    expense::{MonthFilter, MonthQuery, sum_expenses_by_category},
    extract::{Json, Query},
    money::Amount,
};

/// One row of the budget summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetLine {
    pub category: String,
    pub subcategory: String,
    pub budgeted: Amount,
    pub actual: Amount,
    /// `budgeted - actual`, negative when over budget.
    pub remaining: Amount,
}

/// Summarize every (category, subcategory) that has a target or an expense.
///
/// Actual spending is limited to `month`, or all time if `month` is `None`.
/// Rows are ordered by category, then subcategory.
pub fn summarize_budget(
    month: Option<MonthFilter>,
    connection: &Connection,
) -> Result<Vec<BudgetLine>, Error> {
    let mut totals: BTreeMap<(String, String), (Amount, Amount)> = BTreeMap::new();

    for target in list_expense_targets(connection)? {
        totals.entry((target.category, target.subcategory)).or_default().0 = target.amount;
    }

    for (category, subcategory, actual) in sum_expenses_by_category(month, connection)? {
        totals.entry((category, subcategory)).or_default().1 = actual;
    }

    totals
        .into_iter()
        .map(|((category, subcategory), (budgeted, actual))| {
            Ok(BudgetLine {
                category,
                subcategory,
                budgeted,
                actual,
                remaining: budgeted.checked_sub(actual)?,
            })
        })
        .collect()
}

/// Responds with the budget summary, optionally for one month.
pub async fn get_budget_summary(
    State(state): State<BudgetState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<BudgetLine>>, Error> {
    let month = query.filter()?;

    summarize_budget(month, &*lock_connection(&state.db_connection)?).map(Json)
}
