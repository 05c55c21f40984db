//! Lets the client ask whether it is logged in.

use axum::{extract::State, http::HeaderMap};
use serde_json::{Value, json};

use crate::{
    auth::{AuthState, is_authenticated},
    extract::Json,
};

/// Responds with `{"isAuthenticated": bool}`. This route is never rejected
/// for a missing cookie.
pub async fn get_check_auth(State(state): State<AuthState>, headers: HeaderMap) -> Json<Value> {
    Json(json!({ "isAuthenticated": is_authenticated(&headers, &state.cookie_key) }))
}
