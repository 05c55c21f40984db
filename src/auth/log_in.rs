//! The log-in route handler. The [crate::auth::cookie] module handles the
//! lower level cookie logic.

use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, State};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Value, json};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{set_auth_cookie, user::get_user_by_username},
    db::lock_connection,
    extract::Json,
    form::{required, required_text},
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials sent by the client to log in.
#[derive(Deserialize)]
pub struct LogInData {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Handler for log-in requests.
///
/// On a successful log-in request the auth cookie is set.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The username or password is missing.
/// - The username is unknown or the password is not correct.
/// - An internal error occurred when verifying the password.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Json(user_data): Json<LogInData>,
) -> Result<(PrivateCookieJar, Json<Value>), Error> {
    let username = required_text("username", user_data.username)?;
    let password = required(
        "password",
        user_data.password.filter(|password| !password.is_empty()),
    )?;

    let user = {
        let connection = lock_connection(&state.db_connection)?;

        match get_user_by_username(&username, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                tracing::info!("Log-in attempt for unknown user {username:?}");
                return Err(Error::InvalidCredentials);
            }
            Err(error) => return Err(error),
        }
    };

    if !user.password_hash.verify(&password)? {
        tracing::info!("Log-in attempt with wrong password for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;
    tracing::info!("User {} logged in", user.id);

    Ok((jar, Json(json!({ "message": "Logged in successfully" }))))
}
