mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;

pub use core::{
    Account, AccountName, account_exists, adjust_account_balance, create_account_table,
    delete_account_row, get_account, get_all_accounts, insert_account,
};
pub use create_endpoint::create_account_endpoint;
pub use delete_endpoint::delete_account_endpoint;
pub use list_endpoint::list_accounts_endpoint;
