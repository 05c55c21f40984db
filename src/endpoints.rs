//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/accounts/{account_id}', use [format_endpoint].

/// The route for logging in a user.
pub const LOG_IN: &str = "/api/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/logout";
/// The route for the client to check whether it is logged in.
pub const CHECK_AUTH: &str = "/api/check-auth";

/// The route to create and list accounts.
pub const ACCOUNTS: &str = "/api/accounts";
/// The route to access a single account.
pub const ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to add and list the transactions of an account.
pub const ACCOUNT_TRANSACTIONS: &str = "/api/accounts/{account_id}/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// The route to set and list the budgeted amount for each expense category.
pub const EXPENSE_TARGETS: &str = "/api/expenses";
/// The route for comparing budgeted and actual expenses.
pub const BUDGET_SUMMARY: &str = "/api/budget-summary";
/// The route to create and list individual expenses.
pub const INDIVIDUAL_EXPENSES: &str = "/api/individual-expenses";
/// The route to access a single individual expense.
pub const INDIVIDUAL_EXPENSE: &str = "/api/individual-expenses/{expense_id}";

/// The route to create and list journal entries.
pub const JOURNAL: &str = "/api/journal";

/// The route to create and list credit cards.
pub const CREDIT_CARDS: &str = "/api/credit-cards";
/// The route to access a single credit card.
pub const CREDIT_CARD: &str = "/api/credit-cards/{credit_card_id}";

/// The route to create and list subscriptions.
pub const SUBSCRIPTIONS: &str = "/api/subscriptions";
/// The route to access a single subscription.
pub const SUBSCRIPTION: &str = "/api/subscriptions/{subscription_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with the next right brace.
/// For example, in the endpoint path '/api/accounts/{account_id}', '{account_id}' is the parameter.
/// Only the first parameter is replaced.
///
/// If no parameter is found, `endpoint_path` is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints::{self, format_endpoint};

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::LOG_IN,
            endpoints::LOG_OUT,
            endpoints::CHECK_AUTH,
            endpoints::ACCOUNTS,
            endpoints::ACCOUNT,
            endpoints::ACCOUNT_TRANSACTIONS,
            endpoints::TRANSACTION,
            endpoints::EXPENSE_TARGETS,
            endpoints::BUDGET_SUMMARY,
            endpoints::INDIVIDUAL_EXPENSES,
            endpoints::INDIVIDUAL_EXPENSE,
            endpoints::JOURNAL,
            endpoints::CREDIT_CARDS,
            endpoints::CREDIT_CARD,
            endpoints::SUBSCRIPTIONS,
            endpoints::SUBSCRIPTION,
        ] {
            assert_endpoint_is_valid_uri(&format_endpoint(endpoint, 1));
        }
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_path_unchanged_with_no_parameter() {
        assert_eq!(format_endpoint("/hello/world", 1), "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        assert_eq!(
            format_endpoint(endpoints::ACCOUNT_TRANSACTIONS, 12),
            "/api/accounts/12/transactions"
        );
    }
}
