//! Budgeted amounts per expense category and subcategory.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::DatabaseId,
    form::{required, required_text},
    money::Amount,
};

/// How much is budgeted for one subcategory of expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseTarget {
    pub id: DatabaseId,
    pub category: String,
    pub subcategory: String,
    pub amount: Amount,
}

/// A validated budget line to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpenseTarget {
    pub category: String,
    pub subcategory: String,
    pub amount: Amount,
}

/// One element of the request body for setting budget targets.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseTargetForm {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub amount: Option<Amount>,
}

impl TryFrom<ExpenseTargetForm> for NewExpenseTarget {
    type Error = Error;

    fn try_from(form: ExpenseTargetForm) -> Result<Self, Self::Error> {
        Ok(Self {
            category: required_text("category", form.category)?,
            subcategory: required_text("subcategory", form.subcategory)?,
            amount: required("amount", form.amount)?,
        })
    }
}

/// Create the expense target table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_target_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense_target (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                subcategory TEXT NOT NULL,
                amount INTEGER NOT NULL,
                UNIQUE(category, subcategory)
                )",
        (),
    )?;

    Ok(())
}

/// Save every target, overwriting the amount of any target that already
/// exists for the same category and subcategory.
///
/// Either all targets are saved or none are.
pub fn replace_expense_targets(
    targets: &[NewExpenseTarget],
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    {
        let mut statement = transaction.prepare(
            "INSERT INTO expense_target (category, subcategory, amount) VALUES (?1, ?2, ?3)
             ON CONFLICT(category, subcategory) DO UPDATE SET amount = excluded.amount",
        )?;

        for target in targets {
            statement.execute(params![target.category, target.subcategory, target.amount])?;
        }
    }

    transaction.commit()?;

    Ok(())
}

/// Get every target ordered by category, then subcategory.
pub fn list_expense_targets(connection: &Connection) -> Result<Vec<ExpenseTarget>, Error> {
    connection
        .prepare(
            "SELECT id, category, subcategory, amount FROM expense_target
             ORDER BY category, subcategory",
        )?
        .query_map([], map_target_row)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

fn map_target_row(row: &Row) -> Result<ExpenseTarget, rusqlite::Error> {
    Ok(ExpenseTarget {
        id: row.get(0)?,
        category: row.get(1)?,
        subcategory: row.get(2)?,
        amount: row.get(3)?,
    })
}
