//! Integration tests for the app proxy endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The app running with `SHOPIFY_API_SECRET=integration-test-secret`
//!
//! Run with: cargo test -p delivery-date-pro-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use delivery_date_pro_core::DeliveryDate;
use delivery_date_pro_integration_tests::{app_base_url, signed_proxy_url};

const TEST_SHOP: &str = "integration-test.myshopify.com";

#[tokio::test]
#[ignore = "Requires running app and database"]
async fn health_endpoints_respond() {
    let client = Client::new();
    let base_url = app_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach app");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach app");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running app and database"]
async fn available_dates_rejects_unsigned_requests() {
    let client = Client::new();
    let base_url = app_base_url();

    let resp = client
        .get(format!(
            "{base_url}/apps/delivery/available-dates?shop={TEST_SHOP}"
        ))
        .send()
        .await
        .expect("Failed to reach app");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running app and database"]
async fn available_dates_returns_window_partition() {
    let client = Client::new();
    let url = signed_proxy_url(
        "/apps/delivery/available-dates",
        &[("shop", TEST_SHOP), ("timestamp", "1717401600")],
    );

    let resp = client.get(url).send().await.expect("Failed to reach app");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    let available = body["availableDates"].as_array().expect("array");
    let excluded = body["excludedDates"].as_array().expect("array");
    let reasons = body["excludedReasons"].as_object().expect("object");

    // Every excluded date carries exactly one reason
    assert_eq!(excluded.len(), reasons.len());

    // The two sets never overlap
    for date in available {
        assert!(!excluded.contains(date), "{date} in both sets");
    }

    // nextValidDate is the first available date, or null
    if available.is_empty() {
        assert!(body["nextValidDate"].is_null());
    } else {
        assert_eq!(body["nextValidDate"], available[0]);
    }

    // Every date on the wire is a well-formed calendar date
    for date in available.iter().chain(excluded) {
        let date = date.as_str().expect("date string");
        DeliveryDate::parse(date).expect("well-formed date");
    }
}

#[tokio::test]
#[ignore = "Requires running app and database"]
async fn validate_date_agrees_with_availability() {
    let client = Client::new();
    let params = [("shop", TEST_SHOP), ("timestamp", "1717401600")];

    let resp = client
        .get(signed_proxy_url("/apps/delivery/available-dates", &params))
        .send()
        .await
        .expect("Failed to reach app");
    let body: Value = resp.json().await.expect("Failed to parse response");

    let Some(next) = body["nextValidDate"].as_str() else {
        // Nothing available; nothing to cross-check
        return;
    };

    let resp = client
        .post(signed_proxy_url("/apps/delivery/validate-date", &params))
        .json(&json!({ "deliveryDate": next }))
        .send()
        .await
        .expect("Failed to reach app");
    assert_eq!(resp.status(), StatusCode::OK);

    let verdict: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(verdict["valid"], json!(true));
}

#[tokio::test]
#[ignore = "Requires running app and database"]
async fn validate_date_rejects_malformed_dates() {
    let client = Client::new();
    let params = [("shop", TEST_SHOP), ("timestamp", "1717401600")];

    let resp = client
        .post(signed_proxy_url("/apps/delivery/validate-date", &params))
        .json(&json!({ "deliveryDate": "not-a-date" }))
        .send()
        .await
        .expect("Failed to reach app");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
