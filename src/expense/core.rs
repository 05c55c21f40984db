//! Defines the individual expense model, the month filter and their database queries.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    database_id::DatabaseId,
    form::{optional_text, required, required_text},
    money::Amount,
};

// ============================================================================
// MODELS
// ============================================================================

/// Money actually spent on something, as opposed to the budgeted amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndividualExpense {
    pub id: DatabaseId,
    pub amount: Amount,
    pub vendor: String,
    pub date: Date,
    pub category: String,
    pub subcategory: String,
    pub description: Option<String>,
}

/// The validated fields of an expense, used to create or replace one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Amount,
    pub vendor: String,
    pub date: Date,
    pub category: String,
    pub subcategory: String,
    pub description: Option<String>,
}

/// The request body for creating or editing an expense.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseForm {
    pub amount: Option<Amount>,
    pub vendor: Option<String>,
    pub date: Option<Date>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<ExpenseForm> for NewExpense {
    type Error = Error;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        Ok(NewExpense {
            amount: required("amount", form.amount)?,
            vendor: required_text("vendor", form.vendor)?,
            date: required("date", form.date)?,
            category: required_text("category", form.category)?,
            subcategory: required_text("subcategory", form.subcategory)?,
            description: optional_text(form.description),
        })
    }
}

/// A calendar month, as the half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthFilter {
    start: Date,
    end: Date,
}

impl MonthFilter {
    /// Create a filter for `month` (1 to 12) of `year`.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if `month` is out of range or `year`
    /// cannot be represented.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        let month = Month::try_from(month).map_err(|_| {
            Error::Validation(format!("month must be between 1 and 12, got {month}"))
        })?;
        let first_day = |year, month| {
            Date::from_calendar_date(year, month, 1)
                .map_err(|error| Error::Validation(format!("invalid year {year}: {error}")))
        };

        let start = first_day(year, month)?;
        let end = match month {
            Month::December => {
                let next_year = year
                    .checked_add(1)
                    .ok_or_else(|| Error::Validation(format!("invalid year {year}")))?;
                first_day(next_year, Month::January)?
            }
            month => first_day(year, month.next())?,
        };

        Ok(Self { start, end })
    }
}

/// The optional `?month=..&year=..` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<u8>,
    pub year: Option<i32>,
}

impl MonthQuery {
    /// Turn the query into a filter, `None` meaning all time.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if only one of month and year is given,
    /// or if they do not form a valid month.
    pub fn filter(&self) -> Result<Option<MonthFilter>, Error> {
        match (self.month, self.year) {
            (Some(month), Some(year)) => MonthFilter::new(year, month).map(Some),
            (None, None) => Ok(None),
            _ => Err(Error::Validation(
                "month and year must be given together".to_owned(),
            )),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the individual expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_individual_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS individual_expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount INTEGER NOT NULL,
                vendor TEXT NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                subcategory TEXT NOT NULL,
                description TEXT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_individual_expense_date ON individual_expense(date);",
        (),
    )?;

    Ok(())
}

/// Insert a new expense.
pub fn insert_expense(
    expense: &NewExpense,
    connection: &Connection,
) -> Result<IndividualExpense, Error> {
    connection
        .prepare(
            "INSERT INTO individual_expense (amount, vendor, date, category, subcategory, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, amount, vendor, date, category, subcategory, description",
        )?
        .query_row(
            params![
                expense.amount,
                expense.vendor,
                expense.date,
                expense.category,
                expense.subcategory,
                expense.description,
            ],
            map_expense_row,
        )
        .map_err(Error::from)
}

/// Get the expenses in `month`, or every expense if `month` is `None`, most recent first.
pub fn get_expenses(
    month: Option<MonthFilter>,
    connection: &Connection,
) -> Result<Vec<IndividualExpense>, Error> {
    let (start, end) = month.map(|month| (month.start, month.end)).unzip();

    connection
        .prepare(
            "SELECT id, amount, vendor, date, category, subcategory, description
             FROM individual_expense
             WHERE ?1 IS NULL OR (date >= ?1 AND date < ?2)
             ORDER BY date DESC, id DESC",
        )?
        .query_map(params![start, end], map_expense_row)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Total the expenses per category and subcategory in `month`, or over all
/// time if `month` is `None`.
pub fn sum_expenses_by_category(
    month: Option<MonthFilter>,
    connection: &Connection,
) -> Result<Vec<(String, String, Amount)>, Error> {
    let (start, end) = month.map(|month| (month.start, month.end)).unzip();

    connection
        .prepare(
            "SELECT category, subcategory, SUM(amount)
             FROM individual_expense
             WHERE ?1 IS NULL OR (date >= ?1 AND date < ?2)
             GROUP BY category, subcategory",
        )?
        .query_map(params![start, end], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Overwrite the fields of the expense `id`.
///
/// # Errors
/// Returns an [Error::UpdateMissingExpense] if `id` does not refer to an expense.
pub fn update_expense(
    id: DatabaseId,
    expense: &NewExpense,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE individual_expense
         SET amount = ?1, vendor = ?2, date = ?3, category = ?4, subcategory = ?5, description = ?6
         WHERE id = ?7",
        params![
            expense.amount,
            expense.vendor,
            expense.date,
            expense.category,
            expense.subcategory,
            expense.description,
            id,
        ],
    )?;

    match rows_affected {
        0 => Err(Error::UpdateMissingExpense),
        _ => Ok(()),
    }
}

/// Delete the expense `id`.
///
/// # Errors
/// Returns an [Error::DeleteMissingExpense] if `id` does not refer to an expense.
pub fn delete_expense(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM individual_expense WHERE id = ?1", [id])?;

    match rows_affected {
        0 => Err(Error::DeleteMissingExpense),
        _ => Ok(()),
    }
}

fn map_expense_row(row: &Row) -> Result<IndividualExpense, rusqlite::Error> {
    Ok(IndividualExpense {
        id: row.get(0)?,
        amount: row.get(1)?,
        vendor: row.get(2)?,
        date: row.get(3)?,
        category: row.get(4)?,
        subcategory: row.get(5)?,
        description: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error,
        db::initialize,
        expense::core::{
            MonthFilter, NewExpense, delete_expense, get_expenses, insert_expense,
            sum_expenses_by_category, update_expense,
        },
        money::Amount,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_expense(date: Date, cents: i64, subcategory: &str) -> NewExpense {
        NewExpense {
            amount: Amount::from_cents(cents),
            vendor: "Grocer".to_owned(),
            date,
            category: "Food".to_owned(),
            subcategory: subcategory.to_owned(),
            description: None,
        }
    }

    #[test]
    fn lists_only_the_given_month() {
        let conn = get_test_connection();
        let january = insert_expense(&new_expense(date!(2024 - 01 - 31), 1000, "Groceries"), &conn)
            .unwrap();
        insert_expense(&new_expense(date!(2024 - 02 - 01), 2000, "Groceries"), &conn).unwrap();

        let got = get_expenses(Some(MonthFilter::new(2024, 1).unwrap()), &conn).unwrap();

        assert_eq!(got, vec![january]);
        assert_eq!(get_expenses(None, &conn).unwrap().len(), 2);
    }

    #[test]
    fn sums_per_subcategory() {
        let conn = get_test_connection();
        insert_expense(&new_expense(date!(2024 - 01 - 02), 1000, "Groceries"), &conn).unwrap();
        insert_expense(&new_expense(date!(2024 - 01 - 03), 550, "Groceries"), &conn).unwrap();
        insert_expense(&new_expense(date!(2024 - 01 - 04), 700, "Takeaways"), &conn).unwrap();

        let mut sums = sum_expenses_by_category(None, &conn).unwrap();
        sums.sort();

        assert_eq!(
            sums,
            vec![
                ("Food".to_owned(), "Groceries".to_owned(), Amount::from_cents(1550)),
                ("Food".to_owned(), "Takeaways".to_owned(), Amount::from_cents(700)),
            ]
        );
    }

    #[test]
    fn update_and_delete_missing_expense_fail() {
        let conn = get_test_connection();
        let expense = new_expense(date!(2024 - 01 - 02), 1000, "Groceries");

        assert_eq!(
            update_expense(1, &expense, &conn),
            Err(Error::UpdateMissingExpense)
        );
        assert_eq!(delete_expense(1, &conn), Err(Error::DeleteMissingExpense));
    }

    #[test]
    fn update_replaces_fields() {
        let conn = get_test_connection();
        let inserted =
            insert_expense(&new_expense(date!(2024 - 01 - 02), 1000, "Groceries"), &conn).unwrap();
        let mut replacement = new_expense(date!(2024 - 01 - 05), 1250, "Takeaways");
        replacement.description = Some("pizza".to_owned());

        update_expense(inserted.id, &replacement, &conn).unwrap();

        let got = get_expenses(None, &conn).unwrap();
        assert_eq!(got[0].amount, Amount::from_cents(1250));
        assert_eq!(got[0].subcategory, "Takeaways");
        assert_eq!(got[0].description.as_deref(), Some("pizza"));
    }
}
