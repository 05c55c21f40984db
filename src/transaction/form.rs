//! The request body shared by the create and edit transaction endpoints.

use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    form::{optional_text, required},
    money::Amount,
    transaction::NewTransaction,
};

/// The fields a client sends to create or edit a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    pub date: Option<Date>,
    pub vendor: Option<String>,
    pub amount: Option<Amount>,
    pub description: Option<String>,
}

impl TryFrom<TransactionForm> for NewTransaction {
    type Error = Error;

    fn try_from(form: TransactionForm) -> Result<Self, Self::Error> {
        Ok(NewTransaction {
            date: required("date", form.date)?,
            vendor: optional_text(form.vendor),
            amount: required("amount", form.amount)?,
            description: optional_text(form.description),
        })
    }
}
