use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use std::sync::Arc;

use crate::error::{AppError, AppErrorKind, ValidationError};
use crate::orders::{OrderId, OrderStore};
use crate::services::{CheckoutRedirect, CheckoutService, ReceiptService};

pub struct CheckoutState {
    pub checkout: Arc<CheckoutService>,
    pub receipts: Arc<ReceiptService>,
    pub store: Arc<dyn OrderStore>,
}

fn parse_order_id(raw: &str) -> Result<OrderId, AppError> {
    OrderId::parse(raw).ok_or_else(|| {
        AppError::new(AppErrorKind::Validation(ValidationError::Invalid {
            field: "order_id".to_string(),
            reason: "must be a positive integer".to_string(),
        }))
    })
}

/// POST /checkout/{order_id}
pub async fn process_payment(
    State(state): State<Arc<CheckoutState>>,
    Path(order_id): Path<String>,
) -> Result<Json<CheckoutRedirect>, AppError> {
    let order_id = parse_order_id(&order_id)?;
    let redirect = state.checkout.process_payment(order_id).await?;
    Ok(Json(redirect))
}

/// GET /checkout/{order_id}/pay
pub async fn receipt_page(
    State(state): State<Arc<CheckoutState>>,
    Path(order_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let order_id = parse_order_id(&order_id)?;
    let order = state
        .store
        .find_order(order_id)
        .await?
        .ok_or_else(|| AppError::order_not_found(order_id).with_context("receipt_page"))?;

    Ok(Html(state.receipts.render(&order).await))
}
