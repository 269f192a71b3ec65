//! HTTP surface of the payment bridge

pub mod checkout;
pub mod gateway;
pub mod health;
pub mod returns;
pub mod webhooks;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::{GatewayConfig, StoreConfig};
use crate::health::HealthChecker;
use crate::middleware::logging::{request_logging_middleware, UuidRequestId};
use crate::orders::OrderStore;
use crate::payments::provider::PaymentStatusProvider;
use crate::payments::providers::RaiffeisenProvider;
use crate::services::{CheckoutService, PaymentReconciler, ReceiptService};

/// Everything the routes need, wired once at startup.
pub struct ApiContext {
    pub store: Arc<dyn OrderStore>,
    /// Used for status checks; the bank client in production.
    pub status_provider: Arc<dyn PaymentStatusProvider>,
    /// Used to download the payment page SDK.
    pub bank: Arc<RaiffeisenProvider>,
    pub gateway: GatewayConfig,
    pub urls: StoreConfig,
}

pub fn router(ctx: ApiContext) -> Router {
    let reconciler = Arc::new(PaymentReconciler::new(
        ctx.store.clone(),
        ctx.status_provider.clone(),
    ));

    let webhook_routes = Router::new()
        .route("/wc-api/raiffeisen_callback", post(webhooks::handle_callback))
        .with_state(Arc::new(webhooks::WebhookState {
            reconciler: reconciler.clone(),
        }));

    let return_routes = Router::new()
        .route(
            "/wc-api/raiffeisen_success",
            get(returns::handle_success_return),
        )
        .with_state(Arc::new(returns::ReturnState {
            reconciler,
            urls: ctx.urls.clone(),
        }));

    let checkout_state = checkout::CheckoutState {
        checkout: Arc::new(CheckoutService::new(
            ctx.store.clone(),
            ctx.urls.clone(),
            ctx.gateway.enabled,
        )),
        receipts: Arc::new(ReceiptService::new(
            ctx.bank.clone(),
            ctx.urls.clone(),
            ctx.gateway.public_key.clone(),
        )),
        store: ctx.store.clone(),
    };
    let checkout_routes = Router::new()
        .route("/checkout/{order_id}", post(checkout::process_payment))
        .route("/checkout/{order_id}/pay", get(checkout::receipt_page))
        .with_state(Arc::new(checkout_state));

    let gateway_routes = Router::new()
        .route("/api/gateway", get(gateway::get_gateway))
        .with_state(Arc::new(gateway::GatewayDescriptor::from(&ctx.gateway)));

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(HealthChecker::new(ctx.store));

    Router::new()
        .merge(webhook_routes)
        .merge(return_routes)
        .merge(checkout_routes)
        .merge(gateway_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(request_logging_middleware))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
