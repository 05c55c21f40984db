//! Helpers for tests that exercise the full router.

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, build_router,
    auth::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, PasswordHash, ValidatedPassword, create_user},
    db::lock_connection,
    endpoints,
};

pub(crate) const TEST_USERNAME: &str = "test_user";
pub(crate) const TEST_PASSWORD: &str = "averylongandsecurepassword";

/// App state backed by an empty in-memory database.
pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");

    AppState::new(connection, "foobar", DEFAULT_COOKIE_DURATION)
        .expect("Could not create app state")
}

/// A test server for the full router whose requests carry a valid auth cookie.
///
/// The app state is returned so tests can inspect the database directly.
pub(crate) async fn get_logged_in_server() -> (TestServer, AppState) {
    let state = get_test_app_state();
    {
        let connection = lock_connection(&state.db_connection).unwrap();
        let password_hash =
            PasswordHash::new(ValidatedPassword::new(TEST_PASSWORD, &[]).unwrap(), 4).unwrap();
        create_user(TEST_USERNAME, password_hash, &connection).unwrap();
    }

    let mut server =
        TestServer::new(build_router(state.clone())).expect("Could not create test server.");
    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD }))
        .await;
    response.assert_status_ok();
    server.add_cookie(response.cookie(COOKIE_TOKEN));

    (server, state)
}
