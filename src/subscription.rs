//! Recurring subscriptions and when they renew.

use std::{
    fmt::Display,
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::Date;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    db::lock_connection,
    extract::{Json, Path},
    form::{optional_text, required, required_text},
    money::Amount,
};

/// How often a subscription is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Interval {
    fn as_str(&self) -> &'static str {
        match self {
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
            Interval::Quarterly => "quarterly",
            Interval::Yearly => "yearly",
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "weekly" => Ok(Interval::Weekly),
            "monthly" => Ok(Interval::Monthly),
            "quarterly" => Ok(Interval::Quarterly),
            "yearly" => Ok(Interval::Yearly),
            other => Err(Error::Validation(format!(
                "interval must be weekly, monthly, quarterly or yearly, got {other:?}"
            ))),
        }
    }
}

impl ToSql for Interval {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Interval {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A recurring payment for a service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: DatabaseId,
    pub name: String,
    pub fee: Amount,
    pub interval: Interval,
    pub renewal_date: Date,
    pub payment_method: Option<String>,
    pub auto_renewal: bool,
    pub notes: Option<String>,
}

/// The request body for adding a subscription.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionForm {
    pub name: Option<String>,
    pub fee: Option<Amount>,
    pub interval: Option<String>,
    pub renewal_date: Option<Date>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub auto_renewal: bool,
    pub notes: Option<String>,
}

/// Create the subscription table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_subscription_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS subscription (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                fee INTEGER NOT NULL,
                interval TEXT NOT NULL,
                renewal_date TEXT NOT NULL,
                payment_method TEXT,
                auto_renewal INTEGER NOT NULL DEFAULT 0,
                notes TEXT
                )",
        (),
    )?;

    Ok(())
}

fn insert_subscription(
    form: SubscriptionForm,
    connection: &Connection,
) -> Result<Subscription, Error> {
    let name = required_text("name", form.name)?;
    let fee = required("fee", form.fee)?;
    let interval: Interval = required_text("interval", form.interval)?.parse()?;
    let renewal_date = required("renewalDate", form.renewal_date)?;

    connection
        .prepare(
            "INSERT INTO subscription
                (name, fee, interval, renewal_date, payment_method, auto_renewal, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, name, fee, interval, renewal_date, payment_method, auto_renewal, notes",
        )?
        .query_row(
            params![
                name,
                fee,
                interval,
                renewal_date,
                optional_text(form.payment_method),
                form.auto_renewal,
                optional_text(form.notes),
            ],
            map_subscription_row,
        )
        .map_err(Error::from)
}

fn get_subscriptions(connection: &Connection) -> Result<Vec<Subscription>, Error> {
    connection
        .prepare(
            "SELECT id, name, fee, interval, renewal_date, payment_method, auto_renewal, notes
             FROM subscription ORDER BY renewal_date, id",
        )?
        .query_map([], map_subscription_row)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

fn delete_subscription(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    match connection.execute("DELETE FROM subscription WHERE id = ?1", [id])? {
        0 => Err(Error::DeleteMissingSubscription),
        _ => Ok(()),
    }
}

fn map_subscription_row(row: &Row) -> Result<Subscription, rusqlite::Error> {
    Ok(Subscription {
        id: row.get(0)?,
        name: row.get(1)?,
        fee: row.get(2)?,
        interval: row.get(3)?,
        renewal_date: row.get(4)?,
        payment_method: row.get(5)?,
        auto_renewal: row.get(6)?,
        notes: row.get(7)?,
    })
}

/// The state needed by the subscription route handlers.
#[derive(Debug, Clone)]
pub struct SubscriptionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SubscriptionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Add a subscription, responds with the stored subscription.
pub async fn create_subscription_endpoint(
    State(state): State<SubscriptionState>,
    Json(form): Json<SubscriptionForm>,
) -> Result<(StatusCode, Json<Subscription>), Error> {
    let subscription = insert_subscription(form, &*lock_connection(&state.db_connection)?)?;
    tracing::info!(
        "Added {} subscription {} \"{}\"",
        subscription.interval,
        subscription.id,
        subscription.name
    );

    Ok((StatusCode::CREATED, Json(subscription)))
}

/// List every subscription, soonest renewal first.
pub async fn list_subscriptions_endpoint(
    State(state): State<SubscriptionState>,
) -> Result<Json<Vec<Subscription>>, Error> {
    get_subscriptions(&*lock_connection(&state.db_connection)?).map(Json)
}

/// Delete a subscription.
pub async fn delete_subscription_endpoint(
    State(state): State<SubscriptionState>,
    Path(subscription_id): Path<DatabaseId>,
) -> Result<Json<Value>, Error> {
    delete_subscription(subscription_id, &*lock_connection(&state.db_connection)?)?;

    Ok(Json(json!({ "message": "Subscription deleted successfully" })))
}
