//! Integration tests for GET /wc-api/raiffeisen_success

mod common;

use axum::body::Body;
use common::{build_app, order, status_of, MockStatusProvider, CART_URL, SUCCESS_URL};
use http::{header, Request, StatusCode};
use raif_payment_bridge::orders::{InMemoryOrderStore, OrderStatus};
use std::sync::Arc;
use tower::util::ServiceExt;

fn return_request(query: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/wc-api/raiffeisen_success{}", query))
        .body(Body::empty())
        .unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

#[tokio::test]
async fn test_missing_order_id_redirects_to_cart() {
    for query in ["", "?orderId=", "?orderId=0", "?orderId=abc", "?other=1"] {
        let store = Arc::new(InMemoryOrderStore::with_orders([order(1042, OrderStatus::Pending)]));
        let provider = MockStatusProvider::new("SUCCESS");
        let app = build_app(store, provider.clone());

        let response = app.oneshot(return_request(query)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "query: {}", query);
        assert_eq!(location(&response), CART_URL, "query: {}", query);
        assert_eq!(provider.calls(), 0, "query: {}", query);
    }
}

#[tokio::test]
async fn test_completed_order_redirects_to_success_without_bank_call() {
    let store = Arc::new(InMemoryOrderStore::with_orders([order(1042, OrderStatus::Completed)]));
    let provider = MockStatusProvider::new("NOT_PAID");
    let app = build_app(store, provider.clone());

    let response = app.oneshot(return_request("?orderId=1042")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), SUCCESS_URL);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_successful_status_completes_and_redirects_to_success() {
    let store = Arc::new(InMemoryOrderStore::with_orders([order(1042, OrderStatus::Pending)]));
    let provider = MockStatusProvider::new("PAID");
    let app = build_app(store.clone(), provider.clone());

    let response = app.oneshot(return_request("?orderId=1042")).await.unwrap();

    assert_eq!(location(&response), SUCCESS_URL);
    assert_eq!(provider.calls(), 1);
    assert_eq!(status_of(&store, 1042).await, OrderStatus::Completed);
}

#[tokio::test]
async fn test_unsuccessful_status_redirects_to_cart() {
    for status in ["", "NOT_PAID", "DECLINED", "success"] {
        let store = Arc::new(InMemoryOrderStore::with_orders([order(1042, OrderStatus::OnHold)]));
        let provider = MockStatusProvider::new(status);
        let app = build_app(store.clone(), provider.clone());

        let response = app.oneshot(return_request("?orderId=1042")).await.unwrap();

        assert_eq!(location(&response), CART_URL, "status: {:?}", status);
        assert_eq!(provider.calls(), 1);
        assert_eq!(status_of(&store, 1042).await, OrderStatus::OnHold);
    }
}

#[tokio::test]
async fn test_unknown_order_redirects_to_cart() {
    let store = Arc::new(InMemoryOrderStore::new());
    let provider = MockStatusProvider::new("PAID");
    let app = build_app(store, provider.clone());

    let response = app.oneshot(return_request("?orderId=5")).await.unwrap();

    assert_eq!(location(&response), CART_URL);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_webhook_and_return_racing_both_succeed() {
    let store = Arc::new(InMemoryOrderStore::with_orders([order(1042, OrderStatus::Pending)]));
    let provider = MockStatusProvider::new("SUCCESS");
    let app = build_app(store.clone(), provider);

    let webhook = app.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/wc-api/raiffeisen_callback")
            .body(Body::from(r#"{"transaction":{"orderId":1042}}"#))
            .unwrap(),
    );
    let browser = app.oneshot(return_request("?orderId=1042"));

    let (webhook, browser) = tokio::join!(webhook, browser);

    assert_eq!(common::body_string(webhook.unwrap()).await, "OK");
    assert_eq!(location(&browser.unwrap()), SUCCESS_URL);
    assert_eq!(status_of(&store, 1042).await, OrderStatus::Completed);
}

#[tokio::test]
async fn test_repeated_order_id_still_redirects() {
    let store = Arc::new(InMemoryOrderStore::with_orders([order(1042, OrderStatus::Pending)]));
    let provider = MockStatusProvider::new("PAID");
    let app = build_app(store.clone(), provider.clone());

    let response = app
        .clone()
        .oneshot(return_request("?orderId=1042&orderId=1042"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), SUCCESS_URL);
    assert_eq!(status_of(&store, 1042).await, OrderStatus::Completed);

    let response = app
        .oneshot(return_request("?orderId=1042&orderId="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), CART_URL);
    assert_eq!(provider.calls(), 1);
}
