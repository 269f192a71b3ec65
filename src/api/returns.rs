use axum::{
    extract::{Query, State},
    response::Redirect,
};
use std::sync::Arc;
use tracing::info;

use crate::config::StoreConfig;
use crate::services::reconciler::{PaymentReconciler, ReturnTarget};

pub struct ReturnState {
    pub reconciler: Arc<PaymentReconciler>,
    pub urls: StoreConfig,
}

const ORDER_ID_PARAM: &str = "orderId";

/// Last `orderId` in the query string. Repeated keys are not an error.
pub fn order_id_param(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .rev()
        .find(|(key, _)| key == ORDER_ID_PARAM)
        .map(|(_, value)| value.as_str())
}

/// GET /wc-api/raiffeisen_success?orderId=...
///
/// The payment popup sends the browser here on both success and failure.
pub async fn handle_success_return(
    State(state): State<Arc<ReturnState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Redirect {
    let order_id = order_id_param(&pairs);
    let target = state.reconciler.handle_return(order_id).await;

    info!(
        order_id = order_id.unwrap_or(""),
        target = ?target,
        "browser return processed"
    );

    match target {
        ReturnTarget::Success => Redirect::to(&state.urls.success_url),
        ReturnTarget::Cart => Redirect::to(&state.urls.cart_url),
    }
}
