//! Credit cards and their terms.

mod core;
mod endpoints;

pub use core::create_credit_card_table;
pub use endpoints::{
    create_credit_card_endpoint, delete_credit_card_endpoint, list_credit_cards_endpoint,
    update_credit_card_endpoint,
};
