//! Request extractors that report rejections as JSON [Error]s.
//!
//! Axum's own `Json`, `Path` and `Query` extractors reject bad input with plain text
//! bodies. These wrappers turn the rejection into an [Error::Validation] so
//! every client error has the same `{"error": ...}` shape.

use axum::{
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};

use crate::Error;

/// Extract a JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Extract path parameters, e.g. the `42` in `/api/accounts/42`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct Path<T>(pub T);

/// Extract query parameters, e.g. `?month=1&year=2024`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct Query<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::json;

    use crate::extract::{Json, Path};

    #[derive(Deserialize)]
    struct Body {
        name: String,
    }

    async fn handler(Path(id): Path<i64>, Json(body): Json<Body>) -> String {
        format!("{id} {}", body.name)
    }

    fn get_test_server() -> TestServer {
        let app = Router::new().route("/things/{id}", post(handler));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn accepts_valid_input() {
        let server = get_test_server();

        let response = server
            .post("/things/42")
            .json(&json!({ "name": "foo" }))
            .await;

        response.assert_status_ok();
        response.assert_text("42 foo");
    }

    #[tokio::test]
    async fn bad_path_is_json_error() {
        let server = get_test_server();

        let response = server
            .post("/things/abc")
            .json(&json!({ "name": "foo" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<serde_json::Value>();
        assert!(body["error"].is_string(), "got body {body}");
    }

    #[tokio::test]
    async fn missing_field_is_json_error() {
        let server = get_test_server();

        let response = server.post("/things/1").json(&json!({})).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<serde_json::Value>();
        assert!(body["error"].is_string(), "got body {body}");
    }
}
