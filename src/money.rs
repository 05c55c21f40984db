//! Exact monetary amounts.
//!
//! Amounts are held as a whole number of cents so that cached balances can be
//! adjusted with integer arithmetic and never drift from the sum of the
//! transactions they summarise.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// A signed amount of money with at most two decimal places.
///
/// Positive amounts are credits (money in), negative amounts are debits
/// (money out).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// An amount of zero.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a whole number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount as a whole number of cents.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The amount as a decimal number of dollars.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Add two amounts.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the result does not fit in the range
    /// of representable amounts.
    pub fn checked_add(self, other: Amount) -> Result<Amount, Error> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or_else(|| Error::Validation("amount is too large".to_owned()))
    }

    /// Subtract `other` from this amount.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the result does not fit in the range
    /// of representable amounts.
    pub fn checked_sub(self, other: Amount) -> Result<Amount, Error> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or_else(|| Error::Validation("amount is too large".to_owned()))
    }

    /// Take `removed` away from this amount and add `added`.
    ///
    /// Only the final result needs to be representable, e.g. a balance of
    /// `i64::MIN` cents with that same amount removed gives zero.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the result does not fit in the range
    /// of representable amounts.
    pub fn checked_replace(self, removed: Amount, added: Amount) -> Result<Amount, Error> {
        let cents = i128::from(self.0) - i128::from(removed.0) + i128::from(added.0);

        i64::try_from(cents)
            .map(Amount)
            .map_err(|_| Error::Validation("amount is too large".to_owned()))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let value = value.normalize();

        if value.scale() > 2 {
            return Err(Error::Validation(format!(
                "{value} has more than two decimal places"
            )));
        }

        value
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Amount)
            .ok_or_else(|| Error::Validation(format!("{value} is too large")))
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|_| Error::Validation(format!("\"{s}\" is not a valid amount")))?;

        Amount::try_from(decimal)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_decimal().fmt(f)
    }
}

/// Amounts with more cents than this are serialized as strings.
///
/// Below it a float holds the amount closely enough to print back as the
/// exact decimal.
const MAX_FLOAT_CENTS: i64 = 1_000_000_000_000_000;

impl Serialize for Amount {
    /// Serializes as a JSON number, e.g. `454.5`, or as a decimal string such
    /// as `"92233720368547758.07"` when a number could not hold it exactly.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.0.unsigned_abs() < MAX_FLOAT_CENTS as u64 {
            serializer.serialize_f64(self.0 as f64 / 100.0)
        } else {
            serializer.serialize_str(&self.to_string())
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    /// Accepts JSON numbers and numeric strings, e.g. `-45.5` or `"-45.50"`.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let decimal = <Decimal as Deserialize>::deserialize(deserializer)?;
        Amount::try_from(decimal).map_err(serde::de::Error::custom)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Amount)
    }
}
