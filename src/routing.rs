//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    account::{create_account_endpoint, delete_account_endpoint, list_accounts_endpoint},
    auth::{auth_guard, get_check_auth, post_log_in, post_log_out},
    budget::{get_budget_summary, list_expense_targets_endpoint, save_expense_targets_endpoint},
    credit_card::{
        create_credit_card_endpoint, delete_credit_card_endpoint, list_credit_cards_endpoint,
        update_credit_card_endpoint,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, list_expenses_endpoint,
        update_expense_endpoint,
    },
    journal::{create_journal_entry_endpoint, list_journal_entries_endpoint},
    not_found::get_404_not_found,
    subscription::{
        create_subscription_endpoint, delete_subscription_endpoint, list_subscriptions_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(endpoints::CHECK_AUTH, get(get_check_auth));

    let protected_routes = Router::new()
        .route(
            endpoints::ACCOUNTS,
            post(create_account_endpoint).get(list_accounts_endpoint),
        )
        .route(endpoints::ACCOUNT, delete(delete_account_endpoint))
        .route(
            endpoints::ACCOUNT_TRANSACTIONS,
            post(create_transaction_endpoint).get(list_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::EXPENSE_TARGETS,
            post(save_expense_targets_endpoint).get(list_expense_targets_endpoint),
        )
        .route(endpoints::BUDGET_SUMMARY, get(get_budget_summary))
        .route(
            endpoints::INDIVIDUAL_EXPENSES,
            post(create_expense_endpoint).get(list_expenses_endpoint),
        )
        .route(
            endpoints::INDIVIDUAL_EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(
            endpoints::JOURNAL,
            post(create_journal_entry_endpoint).get(list_journal_entries_endpoint),
        )
        .route(
            endpoints::CREDIT_CARDS,
            post(create_credit_card_endpoint).get(list_credit_cards_endpoint),
        )
        .route(
            endpoints::CREDIT_CARD,
            put(update_credit_card_endpoint).delete(delete_credit_card_endpoint),
        )
        .route(
            endpoints::SUBSCRIPTIONS,
            post(create_subscription_endpoint).get(list_subscriptions_endpoint),
        )
        .route(
            endpoints::SUBSCRIPTION,
            delete(delete_subscription_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}



#[cfg(test)]
mod peripheral_route_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::get_logged_in_server,
    };

    #[tokio::test]
    async fn budget_summary_compares_targets_with_expenses() {
        let (server, _) = get_logged_in_server().await;

        server
            .post(endpoints::EXPENSE_TARGETS)
            .json(&json!([
                { "category": "Food", "subcategory": "Groceries", "amount": 400 },
                { "category": "Car", "subcategory": "Fuel", "amount": 80 }
            ]))
            .await
            .assert_status_ok();
        server
            .post(endpoints::INDIVIDUAL_EXPENSES)
            .json(&json!({
                "amount": 120.5,
                "vendor": "Grocer",
                "date": "2024-05-02",
                "category": "Food",
                "subcategory": "Groceries"
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(endpoints::BUDGET_SUMMARY)
            .add_query_param("month", 5)
            .add_query_param("year", 2024)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([
            { "category": "Car", "subcategory": "Fuel", "budgeted": 80.0, "actual": 0.0, "remaining": 80.0 },
            { "category": "Food", "subcategory": "Groceries", "budgeted": 400.0, "actual": 120.5, "remaining": 279.5 }
        ]));

        server
            .get(endpoints::BUDGET_SUMMARY)
            .add_query_param("month", 13)
            .add_query_param("year", 2024)
            .await
            .assert_status_bad_request();
        for path in [endpoints::BUDGET_SUMMARY, endpoints::INDIVIDUAL_EXPENSES] {
            server
                .get(path)
                .add_query_param("month", 12)
                .add_query_param("year", i32::MAX)
                .await
                .assert_status_bad_request();
        }
        server
            .get(endpoints::INDIVIDUAL_EXPENSES)
            .add_query_param("month", 5)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn credit_card_crud() {
        let (server, _) = get_logged_in_server().await;
        let card = json!({
            "lastFourDigits": "4242",
            "type": "Visa",
            "issuer": "Bank",
            "expirationDate": "09/28",
            "creditLimit": 5000,
            "interestRate": 19.99
        });

        let response = server.post(endpoints::CREDIT_CARDS).json(&card).await;
        response.assert_status(StatusCode::CREATED);
        let card_id = response.json::<Value>()["id"].as_i64().unwrap();

        let mut updated_card = card.clone();
        updated_card["nickname"] = json!("Everyday");
        server
            .put(&format_endpoint(endpoints::CREDIT_CARD, card_id))
            .json(&updated_card)
            .await
            .assert_status_ok();

        let cards = server.get(endpoints::CREDIT_CARDS).await.json::<Value>();
        assert_eq!(cards[0]["nickname"], json!("Everyday"));
        assert_eq!(cards[0]["lastFourDigits"], json!("4242"));

        server
            .delete(&format_endpoint(endpoints::CREDIT_CARD, card_id))
            .await
            .assert_status_ok();
        server
            .delete(&format_endpoint(endpoints::CREDIT_CARD, card_id))
            .await
            .assert_status_not_found();

        let mut bad_card = card;
        bad_card["lastFourDigits"] = json!("42");
        server
            .post(endpoints::CREDIT_CARDS)
            .json(&bad_card)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn subscription_create_returns_subscription() {
        let (server, _) = get_logged_in_server().await;

        let response = server
            .post(endpoints::SUBSCRIPTIONS)
            .json(&json!({
                "name": "Streaming",
                "fee": 15.99,
                "interval": "monthly",
                "renewalDate": "2024-06-15"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let subscription = response.json::<Value>();
        assert_eq!(subscription["name"], json!("Streaming"));
        assert_eq!(subscription["autoRenewal"], json!(false));

        let subscription_id = subscription["id"].as_i64().unwrap();
        server
            .delete(&format_endpoint(endpoints::SUBSCRIPTION, subscription_id))
            .await
            .assert_status_ok();
        server
            .get(endpoints::SUBSCRIPTIONS)
            .await
            .assert_json(&json!([]));
    }

    #[tokio::test]
    async fn journal_round_trip() {
        let (server, _) = get_logged_in_server().await;

        server
            .post(endpoints::JOURNAL)
            .json(&json!({ "title": "Payday", "date": "2024-02-01", "content": "Saved 10%" }))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post(endpoints::JOURNAL)
            .json(&json!({ "title": "Missing content", "date": "2024-02-01" }))
            .await
            .assert_status_bad_request();

        let entries = server.get(endpoints::JOURNAL).await.json::<Value>();
        assert_eq!(entries.as_array().map(Vec::len), Some(1));
        assert_eq!(entries[0]["title"], json!("Payday"));
    }
}
