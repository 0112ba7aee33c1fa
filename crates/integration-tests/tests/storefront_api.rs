//! Live HTTP tests for the storefront API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (`mp-cli migrate`)
//! - The storefront server running (cargo run -p marketplace-storefront)
//!
//! Run with: cargo test -p marketplace-integration-tests --test storefront_api -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};

/// Base URL for the storefront API (configurable via environment).
fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

async fn json_body(resp: reqwest::Response) -> Value {
    resp.json().await.unwrap()
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health() {
    let resp = Client::new()
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_vendor_listing_envelope() {
    let resp = Client::new()
        .get(format!("{}/api/vendors", storefront_base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");

    let body = json_body(resp).await;
    assert_eq!(body["success"], json!(true));
    assert!(body["data"].is_array());
    assert!(body.get("error").is_none());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_unknown_vendor_is_not_found() {
    let resp = Client::new()
        .get(format!(
            "{}/api/vendors/no-such-vendor-anywhere",
            storefront_base_url()
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(resp).await,
        json!({"success": false, "error": "Vendor not found"})
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_logout_clears_session_cookies() {
    let resp = Client::new()
        .post(format!("{}/api/auth/logout", storefront_base_url()))
        .header(header::COOKIE, "accessToken=abc; refreshToken=def")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let cookies: Vec<String> = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));

    assert_eq!(
        json_body(resp).await,
        json!({"success": true, "data": {"message": "Logged out successfully"}})
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_cart_validation_round_trip() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/api/cart/validate/update"))
        .json(&json!({"quantity": 12}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        json_body(resp).await,
        json!({"success": true, "data": {"quantity": 12}})
    );

    let resp = client
        .post(format!("{base_url}/api/cart/validate/update"))
        .json(&json!({"quantity": 1.5}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"], json!("Validation failed"));
    assert_eq!(
        body["details"][0],
        json!({"path": "quantity", "message": "Expected integer, received float"})
    );
}
