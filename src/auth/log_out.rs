//! Log-out route handler that invalidates the auth cookie.

use axum_extra::extract::PrivateCookieJar;
use serde_json::{Value, json};

use crate::{auth::invalidate_auth_cookie, extract::Json};

/// Invalidate the auth cookie.
pub async fn post_log_out(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<Value>) {
    let jar = invalidate_auth_cookie(jar);

    (jar, Json(json!({ "message": "Logged out successfully" })))
}
