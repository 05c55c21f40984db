//! Defines the credit card model and its database queries.

use std::str::FromStr;

use rusqlite::{Connection, Row, params, types::Type};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize, Serializer};
use time::Date;

use crate::{
    Error,
    database_id::DatabaseId,
    form::{optional_text, required_text},
    money::Amount,
};

// ============================================================================
// MODELS
// ============================================================================

/// A credit card and its terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub id: DatabaseId,
    #[serde(flatten)]
    pub details: CreditCardDetails,
}

/// The user editable fields of a credit card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardDetails {
    /// Exactly four ASCII digits.
    pub last_four_digits: String,
    /// The card network or product, e.g. "Visa".
    #[serde(rename = "type")]
    pub card_type: String,
    pub issuer: String,
    /// "MM/YY".
    pub expiration_date: String,
    pub general_use: Option<String>,
    pub nickname: Option<String>,
    pub credit_limit: Option<Amount>,
    pub current_balance: Option<Amount>,
    pub minimum_payment: Option<Amount>,
    pub payment_due_date: Option<Date>,
    /// Annual interest rate in percent.
    #[serde(serialize_with = "serialize_rate")]
    pub interest_rate: Option<Decimal>,
    pub rewards_program: Option<String>,
    pub card_status: Option<String>,
    pub authorized_users: Option<String>,
    pub notes: Option<String>,
}

fn serialize_rate<S>(rate: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match rate.and_then(|rate| rate.to_f64()) {
        Some(rate) => serializer.serialize_f64(rate),
        None => serializer.serialize_none(),
    }
}

/// The request body for creating or editing a credit card.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardForm {
    pub last_four_digits: Option<String>,
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub issuer: Option<String>,
    pub expiration_date: Option<String>,
    pub general_use: Option<String>,
    pub nickname: Option<String>,
    pub credit_limit: Option<Amount>,
    pub current_balance: Option<Amount>,
    pub minimum_payment: Option<Amount>,
    pub payment_due_date: Option<Date>,
    pub interest_rate: Option<Decimal>,
    pub rewards_program: Option<String>,
    pub card_status: Option<String>,
    pub authorized_users: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<CreditCardForm> for CreditCardDetails {
    type Error = Error;

    fn try_from(form: CreditCardForm) -> Result<Self, Self::Error> {
        let last_four_digits = required_text("lastFourDigits", form.last_four_digits)?;
        if last_four_digits.len() != 4 || !last_four_digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Validation(
                "lastFourDigits must be exactly four digits".to_owned(),
            ));
        }

        let expiration_date = required_text("expirationDate", form.expiration_date)?;
        if !is_valid_expiration_date(&expiration_date) {
            return Err(Error::Validation(
                "expirationDate must be in the format MM/YY".to_owned(),
            ));
        }

        if form
            .interest_rate
            .is_some_and(|rate| rate.is_sign_negative())
        {
            return Err(Error::Validation(
                "interestRate must not be negative".to_owned(),
            ));
        }

        Ok(Self {
            last_four_digits,
            card_type: required_text("type", form.card_type)?,
            issuer: required_text("issuer", form.issuer)?,
            expiration_date,
            general_use: optional_text(form.general_use),
            nickname: optional_text(form.nickname),
            credit_limit: form.credit_limit,
            current_balance: form.current_balance,
            minimum_payment: form.minimum_payment,
            payment_due_date: form.payment_due_date,
            interest_rate: form.interest_rate,
            rewards_program: optional_text(form.rewards_program),
            card_status: optional_text(form.card_status),
            authorized_users: optional_text(form.authorized_users),
            notes: optional_text(form.notes),
        })
    }
}

/// Whether `text` is "MM/YY" with a month from 01 to 12.
fn is_valid_expiration_date(text: &str) -> bool {
    let Some((month, year)) = text.split_once('/') else {
        return false;
    };

    let is_two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());

    is_two_digits(month)
        && is_two_digits(year)
        && month.parse::<u8>().is_ok_and(|month| (1..=12).contains(&month))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the credit card table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_credit_card_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS credit_card (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                last_four_digits TEXT NOT NULL,
                card_type TEXT NOT NULL,
                issuer TEXT NOT NULL,
                expiration_date TEXT NOT NULL,
                general_use TEXT,
                nickname TEXT,
                credit_limit INTEGER,
                current_balance INTEGER,
                minimum_payment INTEGER,
                payment_due_date TEXT,
                interest_rate TEXT,
                rewards_program TEXT,
                card_status TEXT,
                authorized_users TEXT,
                notes TEXT
                )",
        (),
    )?;

    Ok(())
}

const COLUMNS: &str = "last_four_digits, card_type, issuer, expiration_date, general_use, \
    nickname, credit_limit, current_balance, minimum_payment, payment_due_date, interest_rate, \
    rewards_program, card_status, authorized_users, notes";

/// Insert a new credit card.
pub fn insert_credit_card(
    card: &CreditCardDetails,
    connection: &Connection,
) -> Result<CreditCard, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO credit_card ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
             RETURNING id, {COLUMNS}"
        ))?
        .query_row(
            params![
                card.last_four_digits,
                card.card_type,
                card.issuer,
                card.expiration_date,
                card.general_use,
                card.nickname,
                card.credit_limit,
                card.current_balance,
                card.minimum_payment,
                card.payment_due_date,
                card.interest_rate.map(|rate| rate.to_string()),
                card.rewards_program,
                card.card_status,
                card.authorized_users,
                card.notes,
            ],
            map_credit_card_row,
        )
        .map_err(Error::from)
}

/// Get every credit card ordered by issuer, then card type.
pub fn get_credit_cards(connection: &Connection) -> Result<Vec<CreditCard>, Error> {
    connection
        .prepare(&format!(
            "SELECT id, {COLUMNS} FROM credit_card ORDER BY issuer, card_type, id"
        ))?
        .query_map([], map_credit_card_row)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Overwrite every field of the credit card `id`.
///
/// # Errors
/// Returns an [Error::UpdateMissingCreditCard] if `id` does not refer to a credit card.
pub fn update_credit_card(
    id: DatabaseId,
    card: &CreditCardDetails,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE credit_card SET
            last_four_digits = ?1,
            card_type = ?2,
            issuer = ?3,
            expiration_date = ?4,
            general_use = ?5,
            nickname = ?6,
            credit_limit = ?7,
            current_balance = ?8,
            minimum_payment = ?9,
            payment_due_date = ?10,
            interest_rate = ?11,
            rewards_program = ?12,
            card_status = ?13,
            authorized_users = ?14,
            notes = ?15
         WHERE id = ?16",
        params![
            card.last_four_digits,
            card.card_type,
            card.issuer,
            card.expiration_date,
            card.general_use,
            card.nickname,
            card.credit_limit,
            card.current_balance,
            card.minimum_payment,
            card.payment_due_date,
            card.interest_rate.map(|rate| rate.to_string()),
            card.rewards_program,
            card.card_status,
            card.authorized_users,
            card.notes,
            id,
        ],
    )?;

    match rows_affected {
        0 => Err(Error::UpdateMissingCreditCard),
        _ => Ok(()),
    }
}

/// Delete the credit card `id`.
///
/// # Errors
/// Returns an [Error::DeleteMissingCreditCard] if `id` does not refer to a credit card.
pub fn delete_credit_card(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    match connection.execute("DELETE FROM credit_card WHERE id = ?1", [id])? {
        0 => Err(Error::DeleteMissingCreditCard),
        _ => Ok(()),
    }
}

fn map_credit_card_row(row: &Row) -> Result<CreditCard, rusqlite::Error> {
    let interest_rate = row
        .get::<_, Option<String>>(11)?
        .map(|rate| Decimal::from_str(&rate))
        .transpose()
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(error)))?;

    Ok(CreditCard {
        id: row.get(0)?,
        details: CreditCardDetails {
            last_four_digits: row.get(1)?,
            card_type: row.get(2)?,
            issuer: row.get(3)?,
            expiration_date: row.get(4)?,
            general_use: row.get(5)?,
            nickname: row.get(6)?,
            credit_limit: row.get(7)?,
            current_balance: row.get(8)?,
            minimum_payment: row.get(9)?,
            payment_due_date: row.get(10)?,
            interest_rate,
            rewards_program: row.get(12)?,
            card_status: row.get(13)?,
            authorized_users: row.get(14)?,
            notes: row.get(15)?,
        },
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
pub(crate) fn test_form(last_four_digits: &str, issuer: &str) -> CreditCardForm {
    CreditCardForm {
        last_four_digits: Some(last_four_digits.to_owned()),
        card_type: Some("Visa".to_owned()),
        issuer: Some(issuer.to_owned()),
        expiration_date: Some("08/27".to_owned()),
        credit_limit: Some(Amount::from_cents(500000)),
        interest_rate: Some(Decimal::new(1995, 2)),
        ..Default::default()
    }
}


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::{
        Error,
        credit_card::core::{
            CreditCardDetails, delete_credit_card, get_credit_cards, insert_credit_card,
            test_form, update_credit_card,
        },
        db::initialize,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn details(last_four_digits: &str, issuer: &str) -> CreditCardDetails {
        CreditCardDetails::try_from(test_form(last_four_digits, issuer)).unwrap()
    }

    #[test]
    fn insert_round_trips_interest_rate() {
        let conn = get_test_connection();

        let card = insert_credit_card(&details("1234", "Bank"), &conn).unwrap();

        assert_eq!(card.details.interest_rate, Some(Decimal::new(1995, 2)));
        assert_eq!(get_credit_cards(&conn), Ok(vec![card]));
    }

    #[test]
    fn lists_by_issuer() {
        let conn = get_test_connection();
        insert_credit_card(&details("1111", "Zeta Bank"), &conn).unwrap();
        insert_credit_card(&details("2222", "Alpha Bank"), &conn).unwrap();

        let issuers = get_credit_cards(&conn)
            .unwrap()
            .into_iter()
            .map(|card| card.details.issuer)
            .collect::<Vec<_>>();

        assert_eq!(issuers, ["Alpha Bank", "Zeta Bank"]);
    }

    #[test]
    fn serializes_camel_case() {
        let conn = get_test_connection();
        let card = insert_credit_card(&details("1234", "Bank"), &conn).unwrap();

        let json = serde_json::to_value(card).unwrap();

        assert_eq!(json["lastFourDigits"], json!("1234"));
        assert_eq!(json["type"], json!("Visa"));
        assert_eq!(json["creditLimit"], json!(5000.0));
        let interest_rate = json["interestRate"].as_f64().unwrap();
        assert!((interest_rate - 19.95).abs() < 1e-9, "got {interest_rate}");
        assert_eq!(json["nickname"], json!(null));
    }

    #[test]
    fn update_and_delete() {
        let conn = get_test_connection();
        let card = insert_credit_card(&details("1234", "Bank"), &conn).unwrap();

        update_credit_card(card.id, &details("9876", "Other Bank"), &conn).unwrap();
        assert_eq!(
            get_credit_cards(&conn).unwrap()[0].details.last_four_digits,
            "9876"
        );

        delete_credit_card(card.id, &conn).unwrap();
        assert_eq!(
            delete_credit_card(card.id, &conn),
            Err(Error::DeleteMissingCreditCard)
        );
        assert_eq!(
            update_credit_card(card.id, &details("1234", "Bank"), &conn),
            Err(Error::UpdateMissingCreditCard)
        );
    }
}
