//! Route handlers for individual expenses.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    db::lock_connection,
    expense::core::{
        ExpenseForm, IndividualExpense, MonthQuery, NewExpense, delete_expense, get_expenses,
        insert_expense, update_expense,
    },
    extract::{Json, Path, Query},
};

/// The state needed by the expense route handlers.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Record an expense, responds with the new expense's ID.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Json(form): Json<ExpenseForm>,
) -> Result<impl IntoResponse, Error> {
    let new_expense = NewExpense::try_from(form)?;
    let expense = insert_expense(&new_expense, &*lock_connection(&state.db_connection)?)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": expense.id,
            "message": "Expense added successfully",
        })),
    ))
}

/// List the expenses of one month if `month` and `year` are given, otherwise all expenses.
pub async fn list_expenses_endpoint(
    State(state): State<ExpenseState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<IndividualExpense>>, Error> {
    let month = query.filter()?;

    get_expenses(month, &*lock_connection(&state.db_connection)?).map(Json)
}

/// Replace every field of an expense.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<DatabaseId>,
    Json(form): Json<ExpenseForm>,
) -> Result<Json<Value>, Error> {
    let expense = NewExpense::try_from(form)?;
    update_expense(expense_id, &expense, &*lock_connection(&state.db_connection)?)?;

    Ok(Json(json!({ "message": "Expense updated successfully" })))
}

/// Delete an expense.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<DatabaseId>,
) -> Result<Json<Value>, Error> {
    delete_expense(expense_id, &*lock_connection(&state.db_connection)?)?;

    Ok(Json(json!({ "message": "Expense deleted successfully" })))
}
