//! Storefront API routing and error mapping.
//!
//! The database behind these routers is unreachable, so only behaviour that
//! is decided before (or instead of) a store call is asserted on success
//! paths; everything else must come back as `503`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use souq_core::settings::StoreSettings;
use souq_integration_tests::{
    empty, request, send, storefront_app, unreachable_pool, with_json, with_raw_json,
};

const PRODUCT_ID: &str = "8d6f8a9e-3c1b-4c51-9d35-0d2b6a2f6c11";

fn app() -> axum::Router {
    let settings = StoreSettings {
        store_name: "Dar El Hana".to_owned(),
        google_sheet_api_url: Some("https://script.example.net/hook".to_owned()),
        telegram_chat_id: Some("-100200300".to_owned()),
        ..StoreSettings::default()
    };
    storefront_app(unreachable_pool(), settings)
}

#[tokio::test]
async fn test_health_does_not_touch_database() {
    let (status, body) = send(app(), empty(request("GET", "/health"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let (status, _) = send(app(), empty(request("GET", "/health/ready"))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_settings_hide_integration_endpoints() {
    let (status, body) = send(app(), empty(request("GET", "/api/settings"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store_name"], "Dar El Hana");
    assert!(body.get("google_sheet_api_url").is_none());
    assert!(body.get("telegram_chat_id").is_none());
}

#[tokio::test]
async fn test_product_lookup_unavailable() {
    let (status, body) = send(
        app(),
        empty(request("GET", &format!("/api/products/{PRODUCT_ID}"))),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "service_unavailable");
}

#[tokio::test]
async fn test_malformed_product_id_is_rejected() {
    let (status, _) = send(app(), empty(request("GET", "/api/products/not-a-uuid"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_order_is_validation_error() {
    let (status, body) = send(
        app(),
        with_raw_json(request("POST", "/api/orders"), "{\"product_id\": "),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_order_missing_quantity_is_validation_error() {
    let order = json!({
        "product_id": PRODUCT_ID,
        "customer_name": "Yacine",
        "customer_phone": "0550123456",
        "wilaya": "Alger",
    });
    let (status, body) = send(app(), with_json(request("POST", "/api/orders"), &order)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_quote_needs_catalog() {
    let (status, _) = send(
        app(),
        with_json(
            request("POST", &format!("/api/products/{PRODUCT_ID}/quote")),
            &json!({"quantity": 2, "wilaya": "Oran"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = send(app(), empty(request("GET", "/api/carts"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
