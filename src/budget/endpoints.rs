//! Route handlers for setting and listing budget targets.

use axum::extract::State;
use serde_json::{Value, json};

use crate::{
    Error,
    budget::{
        BudgetState,
        core::{
            ExpenseTarget, ExpenseTargetForm, NewExpenseTarget, list_expense_targets,
            replace_expense_targets,
        },
    },
    db::lock_connection,
    extract::Json,
};

/// Save a list of budget targets.
///
/// Nothing is saved if any target in the list is invalid.
pub async fn save_expense_targets_endpoint(
    State(state): State<BudgetState>,
    Json(forms): Json<Vec<ExpenseTargetForm>>,
) -> Result<Json<Value>, Error> {
    let targets = forms
        .into_iter()
        .map(NewExpenseTarget::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    replace_expense_targets(&targets, &*lock_connection(&state.db_connection)?)?;
    tracing::info!("Saved {} expense targets", targets.len());

    Ok(Json(json!({ "message": "Expenses saved successfully" })))
}

/// List every budget target.
pub async fn list_expense_targets_endpoint(
    State(state): State<BudgetState>,
) -> Result<Json<Vec<ExpenseTarget>>, Error> {
    list_expense_targets(&*lock_connection(&state.db_connection)?).map(Json)
}
