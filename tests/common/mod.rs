#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use raif_payment_bridge::api::{router, ApiContext};
use raif_payment_bridge::config::{GatewayConfig, StoreConfig};
use raif_payment_bridge::orders::{
    BillingContact, InMemoryOrderStore, Order, OrderId, OrderItem, OrderStatus, OrderStore,
};
use raif_payment_bridge::payments::error::PaymentResult;
use raif_payment_bridge::payments::provider::PaymentStatusProvider;
use raif_payment_bridge::payments::providers::RaiffeisenProvider;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const SECRET_KEY: &str = "test-merchant";
pub const PUBLIC_KEY: &str = "test-terminal";
pub const PUBLIC_URL: &str = "https://shop.test";
pub const SUCCESS_URL: &str = "https://shop.test/checkout/order-received/";
pub const CART_URL: &str = "https://shop.test/cart/";
pub const SDK_SOURCE: &str = "window.PaymentPageSdk = function (publicKey, options) {};";

pub fn order_id(value: i64) -> OrderId {
    OrderId::new(value).expect("positive id")
}

pub fn order(id: i64, status: OrderStatus) -> Order {
    Order {
        id: order_id(id),
        total: dec!(2499.90),
        billing: BillingContact {
            first_name: "Anna".to_string(),
            last_name: "Smirnova".to_string(),
            phone: "+79160000000".to_string(),
            email: "anna@example.com".to_string(),
        },
        items: vec![
            OrderItem {
                name: "Coffee beans".to_string(),
                unit_price: dec!(999.95),
                quantity: 2,
                line_total: dec!(1999.90),
            },
            OrderItem {
                name: "Grinder brush".to_string(),
                unit_price: dec!(500),
                quantity: 1,
                line_total: dec!(500),
            },
        ],
        status,
    }
}

pub async fn status_of(store: &InMemoryOrderStore, id: i64) -> OrderStatus {
    store
        .find_order(order_id(id))
        .await
        .expect("lookup should succeed")
        .expect("order should exist")
        .status
}

/// Status provider returning a fixed status and counting lookups.
pub struct MockStatusProvider {
    status: String,
    calls: AtomicUsize,
}

impl MockStatusProvider {
    pub fn new(status: &str) -> Arc<Self> {
        Arc::new(Self {
            status: status.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentStatusProvider for MockStatusProvider {
    async fn fetch_order_status(&self, _order_id: OrderId) -> PaymentResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.status.clone()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// URL on loopback where nothing listens.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub fn gateway_config(api_base_url: &str, sdk_url: &str) -> GatewayConfig {
    GatewayConfig {
        secret_key: SECRET_KEY.to_string(),
        public_key: PUBLIC_KEY.to_string(),
        api_base_url: api_base_url.to_string(),
        sdk_url: sdk_url.to_string(),
        timeout_secs: 5,
        max_retries: 0,
        ..GatewayConfig::default()
    }
}

pub fn store_config() -> StoreConfig {
    StoreConfig::with_public_url(PUBLIC_URL)
}

/// App wired with a mock status provider; the bank itself is unreachable.
pub fn build_app(
    store: Arc<InMemoryOrderStore>,
    status_provider: Arc<dyn PaymentStatusProvider>,
) -> Router {
    let unreachable = closed_port_url();
    let gateway = gateway_config(&unreachable, &format!("{}/sdk.js", unreachable));
    build_app_with_gateway(store, status_provider, gateway)
}

pub fn build_app_with_gateway(
    store: Arc<InMemoryOrderStore>,
    status_provider: Arc<dyn PaymentStatusProvider>,
    gateway: GatewayConfig,
) -> Router {
    let bank = Arc::new(RaiffeisenProvider::new(gateway.clone()).expect("bank client"));
    router(ApiContext {
        store,
        status_provider,
        bank,
        gateway,
        urls: store_config(),
    })
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Local stand-in for the bank: order status API plus the SDK script.
pub struct FakeBank {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
}

impl FakeBank {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// `responses` maps an order id to the HTTP status and raw body to return.
pub async fn spawn_fake_bank(responses: HashMap<i64, (u16, String)>) -> FakeBank {
    let hits = Arc::new(AtomicUsize::new(0));
    let responses = Arc::new(responses);

    let status_hits = hits.clone();
    let app = Router::new()
        .route(
            "/api/payment/v1/orders/{order_id}",
            get(move |Path(order_id): Path<i64>, headers: HeaderMap| {
                let responses = responses.clone();
                let hits = status_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    let authorized = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        == Some(&format!("Bearer {}", SECRET_KEY)[..]);
                    if !authorized {
                        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
                            .into_response();
                    }
                    match responses.get(&order_id) {
                        Some((code, body)) => (
                            StatusCode::from_u16(*code).expect("valid status"),
                            [("content-type", "application/json")],
                            body.clone(),
                        )
                            .into_response(),
                        None => (StatusCode::NOT_FOUND, "{}".to_string()).into_response(),
                    }
                }
            }),
        )
        .route("/sdk.js", get(|| async { SDK_SOURCE }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake bank");
    let addr = listener.local_addr().expect("fake bank addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    FakeBank {
        base_url: format!("http://{}", addr),
        hits,
    }
}
