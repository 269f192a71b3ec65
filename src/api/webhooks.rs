use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::info;

use crate::services::reconciler::PaymentReconciler;

pub struct WebhookState {
    pub reconciler: Arc<PaymentReconciler>,
}

/// POST /wc-api/raiffeisen_callback
///
/// Server-to-server notification from the bank. The body is read raw so that
/// malformed JSON still gets the `FAIL` answer instead of an extractor
/// rejection.
pub async fn handle_callback(
    State(state): State<Arc<WebhookState>>,
    body: Bytes,
) -> impl IntoResponse {
    info!(bytes = body.len(), "Received raiffeisen webhook");

    let ack = state.reconciler.handle_callback(&body).await;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ack.as_str(),
    )
}
