//! Integration tests for the customer order report endpoint.
//!
//! These tests require:
//! - A running `PostgreSQL` database holding the store read model, seeded
//!   with the customer named by `BRIDGE_SEEDED_EMAIL` (two orders expected)
//! - The connector running with `BRIDGE_API_ENABLED=true` and
//!   `BRIDGE_API_TOKEN` matching the token used here
//!
//! Run with: cargo test -p zendesk-bridge-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;

use zendesk_bridge_integration_tests::{api_token, base_url, seeded_email};

fn report_url(param: &str) -> String {
    format!("{}/v1/customer-orders?{param}", base_url())
}

async fn get_report(client: &Client, param: &str, token: Option<&str>) -> reqwest::Response {
    let mut request = client.get(report_url(param));
    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {token}"));
    }
    request.send().await.expect("Failed to send request")
}

#[tokio::test]
#[ignore = "Requires running connector"]
async fn test_health() {
    let client = Client::new();
    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach connector");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running connector"]
async fn test_missing_credential_is_403() {
    let client = Client::new();
    let resp = get_report(&client, &seeded_email(), None).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(
        body["message"],
        "Unable to extract authorization header from request"
    );
}

#[tokio::test]
#[ignore = "Requires running connector with API enabled"]
async fn test_non_bearer_credential_is_401() {
    let client = Client::new();
    let resp = client
        .get(report_url(&seeded_email()))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "No authorisation token provided");
}

#[tokio::test]
#[ignore = "Requires running connector with API enabled"]
async fn test_wrong_token_is_401() {
    let client = Client::new();
    let resp = get_report(&client, &seeded_email(), Some("definitelywrong1")).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "Not authorised");
}

#[tokio::test]
#[ignore = "Requires connector started with BRIDGE_API_ENABLED=false"]
async fn test_disabled_api_is_403() {
    let client = Client::new();
    let resp = get_report(&client, &seeded_email(), Some(&api_token())).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], "API access disabled");
}

#[tokio::test]
#[ignore = "Requires running connector with API enabled"]
async fn test_parameter_count_mismatch_is_400() {
    let client = Client::new();
    let param = format!("{}&extra=1", seeded_email());
    let resp = get_report(&client, &param, Some(&api_token())).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["success"], Value::Bool(false));
}

#[tokio::test]
#[ignore = "Requires running connector and seeded database"]
async fn test_seeded_customer_report() {
    let client = Client::new();
    let email = seeded_email();
    let resp = get_report(&client, &email, Some(&api_token())).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");

    assert_eq!(body["email"], email.as_str());
    assert!(body["group"].as_str().is_some());
    assert!(body["lifetime_sales"].as_str().is_some());

    let orders = body["orders"].as_array().expect("orders must be an array");
    assert_eq!(orders.len(), 2);

    // Newest first: increment ids descend.
    let first = orders[0]["increment_id"].as_str().expect("increment_id");
    let second = orders[1]["increment_id"].as_str().expect("increment_id");
    assert!(first > second, "orders must be ordered newest-first");

    for order in orders {
        assert!(order["grand_total"].as_str().is_some());
        assert!(order["items"].is_array());
    }
}

#[tokio::test]
#[ignore = "Requires running connector and seeded database"]
async fn test_repeated_reports_are_identical() {
    let client = Client::new();
    let email = seeded_email();

    let first = get_report(&client, &email, Some(&api_token()))
        .await
        .text()
        .await
        .expect("Failed to read body");
    let second = get_report(&client, &email, Some(&api_token()))
        .await
        .text()
        .await
        .expect("Failed to read body");

    assert_eq!(first, second);
}

#[tokio::test]
#[ignore = "Requires running connector and seeded database"]
async fn test_unknown_email_still_returns_200() {
    let client = Client::new();
    let resp = get_report(&client, "nobody@example.com", Some(&api_token())).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["group"], "-");
    assert_eq!(body["orders"], Value::Array(vec![]));
}
