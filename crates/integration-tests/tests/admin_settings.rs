//! Integration tests for the admin JSON API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The app running with `ADMIN_API_TOKEN=integration-test-token`
//!
//! Run with: cargo test -p delivery-date-pro-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use delivery_date_pro_integration_tests::{admin_token, app_base_url};

const TEST_SHOP: &str = "integration-test.myshopify.com";

fn admin_url(path: &str) -> String {
    format!("{}/admin/{TEST_SHOP}{path}", app_base_url())
}

#[tokio::test]
#[ignore = "Requires running app and database"]
async fn settings_require_the_bearer_token() {
    let client = Client::new();

    let resp = client
        .get(admin_url("/settings"))
        .send()
        .await
        .expect("Failed to reach app");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running app and database"]
async fn settings_default_then_update_round_trip() {
    let client = Client::new();
    let token = admin_token();

    // A shop with no row reads back the documented defaults
    let resp = client
        .get(admin_url("/settings"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to reach app");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["cutoffTime"], json!("14:00"));
    assert_eq!(body["dailyCapacity"], json!(50));

    // Partial update touches only the named fields
    let resp = client
        .put(admin_url("/settings"))
        .bearer_auth(&token)
        .json(&json!({ "dailyCapacity": 10 }))
        .send()
        .await
        .expect("Failed to reach app");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["dailyCapacity"], json!(10));
    assert_eq!(body["cutoffTime"], json!("14:00"));
}

#[tokio::test]
#[ignore = "Requires running app and database"]
async fn blackouts_create_list_remove() {
    let client = Client::new();
    let token = admin_token();

    let resp = client
        .post(admin_url("/blackouts"))
        .bearer_auth(&token)
        .json(&json!({ "date": "12-25", "recurring": true, "label": "Christmas" }))
        .send()
        .await
        .expect("Failed to reach app");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.expect("Failed to parse response");
    let id = created["id"].as_str().expect("id").to_owned();

    let resp = client
        .get(admin_url("/blackouts"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to reach app");
    let listed: Value = resp.json().await.expect("Failed to parse response");
    assert!(
        listed
            .as_array()
            .expect("array")
            .iter()
            .any(|row| row["id"] == json!(id))
    );

    let resp = client
        .delete(admin_url(&format!("/blackouts/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to reach app");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
