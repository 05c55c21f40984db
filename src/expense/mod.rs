//! Individual expenses: what was actually spent, by category and subcategory.

mod core;
mod endpoints;

pub use core::{
    MonthFilter, MonthQuery, create_individual_expense_table, sum_expenses_by_category,
};
pub use endpoints::{
    create_expense_endpoint, delete_expense_endpoint, list_expenses_endpoint,
    update_expense_endpoint,
};
