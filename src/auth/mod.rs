//! User log-in backed by an encrypted cookie, and the middleware that guards
//! every other route.

mod check_auth;
mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod token;
mod user;

pub use check_auth::get_check_auth;
pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::post_log_in;
pub use log_out::post_log_out;
pub use middleware::{AuthState, auth_guard, is_authenticated};
pub use password::{PasswordHash, ValidatedPassword};
pub use user::{User, UserID, create_user, create_user_table};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
