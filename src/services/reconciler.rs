//! Payment outcome reconciliation
//!
//! Both the bank webhook and the shopper's browser return end up here. Neither
//! trusts the status it was handed: the status is always re-read from the bank
//! before the order is touched. The two paths may race on the same order; the
//! store's idempotent transition to `completed` is the only coordination.

use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::orders::{OrderId, OrderStatus, OrderStore, StoreResult};
use crate::payments::provider::PaymentStatusProvider;
use crate::payments::types::PaymentState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Completed,
    NotConfirmed,
}

/// Plain-text acknowledgement returned to the bank's webhook sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAck {
    Ok,
    Fail,
}

impl CallbackAck {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackAck::Ok => "OK",
            CallbackAck::Fail => "FAIL",
        }
    }
}

/// Where the shopper's browser is sent after returning from the payment popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTarget {
    Success,
    Cart,
}

pub struct PaymentReconciler {
    store: Arc<dyn OrderStore>,
    provider: Arc<dyn PaymentStatusProvider>,
}

impl PaymentReconciler {
    pub fn new(store: Arc<dyn OrderStore>, provider: Arc<dyn PaymentStatusProvider>) -> Self {
        Self { store, provider }
    }

    /// Marks the order completed when `status` is in the success set.
    pub async fn reconcile(&self, order_id: OrderId, status: &str) -> StoreResult<ReconcileOutcome> {
        match PaymentState::from_bank_status(status) {
            PaymentState::Success => {
                self.store
                    .update_status(order_id, OrderStatus::Completed)
                    .await?;
                info!(order_id = %order_id, status = %status, "payment confirmed, order completed");
                Ok(ReconcileOutcome::Completed)
            }
            PaymentState::NotSuccessful => {
                info!(order_id = %order_id, status = %status, "payment not confirmed");
                Ok(ReconcileOutcome::NotConfirmed)
            }
        }
    }

    /// Handles a raw webhook body. Anything without a usable
    /// `transaction.orderId` is answered with `FAIL` before contacting the bank;
    /// everything else is answered with `OK` whatever the reconciliation result.
    pub async fn handle_callback(&self, payload: &[u8]) -> CallbackAck {
        let Some(order_id) = callback_order_id(payload) else {
            warn!("webhook without a usable transaction.orderId");
            return CallbackAck::Fail;
        };

        info!(order_id = %order_id, "webhook received");
        let status = self.provider.get_order_status(order_id).await;
        if let Err(e) = self.reconcile(order_id, &status).await {
            error!(order_id = %order_id, error = %e, "webhook reconciliation failed");
        }

        CallbackAck::Ok
    }

    /// Handles the browser return. `raw_order_id` is the `orderId` query value.
    pub async fn handle_return(&self, raw_order_id: Option<&str>) -> ReturnTarget {
        let Some(order_id) = raw_order_id.and_then(OrderId::parse) else {
            return ReturnTarget::Cart;
        };

        match self.store.find_order(order_id).await {
            Ok(Some(order)) if order.is_completed() => return ReturnTarget::Success,
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(order_id = %order_id, "browser returned for unknown order");
                return ReturnTarget::Cart;
            }
            Err(e) => {
                error!(order_id = %order_id, error = %e, "order lookup failed");
                return ReturnTarget::Cart;
            }
        }

        let status = self.provider.get_order_status(order_id).await;
        if let Err(e) = self.reconcile(order_id, &status).await {
            error!(order_id = %order_id, error = %e, "return reconciliation failed");
        }

        match PaymentState::from_bank_status(&status) {
            PaymentState::Success => ReturnTarget::Success,
            PaymentState::NotSuccessful => ReturnTarget::Cart,
        }
    }
}

fn callback_order_id(payload: &[u8]) -> Option<OrderId> {
    let body: JsonValue = serde_json::from_slice(payload).ok()?;
    body.pointer("/transaction/orderId").and_then(OrderId::from_json)
}
