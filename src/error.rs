//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing or malformed.
    ///
    /// The message is shown to the client, so it should explain which field
    /// is at fault.
    #[error("{0}")]
    Validation(String),

    /// The username and password combination did not match a registered user.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The request did not carry a valid auth cookie.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth cookie could not be serialized or deserialized.
    #[error("could not read or write the auth token: {0}")]
    InvalidToken(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The account referenced by a request does not exist.
    #[error("account not found")]
    AccountNotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Tried to update a credit card that does not exist
    #[error("tried to update a credit card that is not in the database")]
    UpdateMissingCreditCard,

    /// Tried to delete a credit card that does not exist
    #[error("tried to delete a credit card that is not in the database")]
    DeleteMissingCreditCard,

    /// Tried to delete a subscription that does not exist
    #[error("tried to delete a subscription that is not in the database")]
    DeleteMissingSubscription,

    /// The specified account name already exists in the database.
    #[error("the account \"{0}\" already exists")]
    DuplicateAccountName(String),

    /// The specified username already exists in the database.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that the client should receive for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::TooWeak(_)
            | Error::DuplicateAccountName(_)
            | Error::DuplicateUsername(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials
            | Error::NotAuthenticated
            | Error::CookieMissing
            | Error::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound
            | Error::AccountNotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::DeleteMissingAccount
            | Error::UpdateMissingExpense
            | Error::DeleteMissingExpense
            | Error::UpdateMissingCreditCard
            | Error::DeleteMissingCreditCard
            | Error::DeleteMissingSubscription => StatusCode::NOT_FOUND,
            Error::HashingError(_) | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            Error::CookieMissing | Error::InvalidToken(_) => Error::NotAuthenticated.to_string(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("An unexpected error occurred: {}", error);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::{Value, json};

    use crate::Error;

    async fn into_status_and_body(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("could not read response body");

        (
            status,
            serde_json::from_slice(&body).expect("response body is not JSON"),
        )
    }

    #[tokio::test]
    async fn validation_error_is_bad_request() {
        let (status, body) =
            into_status_and_body(Error::Validation("amount is required".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "amount is required" }));
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (status, _) = into_status_and_body(Error::DeleteMissingTransaction).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sql_error_hides_details() {
        let (status, body) =
            into_status_and_body(Error::SqlError(rusqlite::Error::InvalidQuery)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().expect("error should be a string");
        assert!(
            !message.contains("SQL"),
            "want a generic message, got {message:?}"
        );
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
