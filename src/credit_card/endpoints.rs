//! Route handlers for credit cards.

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
    credit_card::core::{
        CreditCard, CreditCardDetails, CreditCardForm, delete_credit_card, get_credit_cards,
        insert_credit_card, update_credit_card,
    },
    database_id::DatabaseId,
    db::lock_connection,
    extract::{Json, Path},
};

/// The state needed by the credit card route handlers.
#[derive(Debug, Clone)]
pub struct CreditCardState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreditCardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Add a credit card, responds with the new card's ID.
pub async fn create_credit_card_endpoint(
    State(state): State<CreditCardState>,
    Json(form): Json<CreditCardForm>,
) -> Result<impl IntoResponse, Error> {
    let details = CreditCardDetails::try_from(form)?;
    let card = insert_credit_card(&details, &*lock_connection(&state.db_connection)?)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": card.id,
            "message": "Credit card added successfully",
        })),
    ))
}

/// List every credit card.
pub async fn list_credit_cards_endpoint(
    State(state): State<CreditCardState>,
) -> Result<Json<Vec<CreditCard>>, Error> {
    get_credit_cards(&*lock_connection(&state.db_connection)?).map(Json)
}

/// Replace every field of a credit card.
pub async fn update_credit_card_endpoint(
    State(state): State<CreditCardState>,
    Path(credit_card_id): Path<DatabaseId>,
    Json(form): Json<CreditCardForm>,
) -> Result<Json<Value>, Error> {
    let details = CreditCardDetails::try_from(form)?;
    update_credit_card(
        credit_card_id,
        &details,
        &*lock_connection(&state.db_connection)?,
    )?;

    Ok(Json(json!({ "message": "Credit card updated successfully" })))
}

/// Delete a credit card.
pub async fn delete_credit_card_endpoint(
    State(state): State<CreditCardState>,
    Path(credit_card_id): Path<DatabaseId>,
) -> Result<Json<Value>, Error> {
    delete_credit_card(credit_card_id, &*lock_connection(&state.db_connection)?)?;

    Ok(Json(json!({ "message": "Credit card deleted successfully" })))
}
