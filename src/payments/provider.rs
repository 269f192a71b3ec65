use crate::orders::OrderId;
use crate::payments::error::PaymentResult;
use async_trait::async_trait;
use tracing::warn;

/// Source of authoritative payment status for an order.
#[async_trait]
pub trait PaymentStatusProvider: Send + Sync {
    /// Raw bank status, `None` when the response carries no status value.
    async fn fetch_order_status(&self, order_id: OrderId) -> PaymentResult<Option<String>>;

    fn name(&self) -> &'static str;

    /// Status string with every failure collapsed to `""`.
    async fn get_order_status(&self, order_id: OrderId) -> String {
        match self.fetch_order_status(order_id).await {
            Ok(status) => status.unwrap_or_default(),
            Err(e) => {
                warn!(
                    provider = self.name(),
                    order_id = %order_id,
                    error_kind = e.kind(),
                    error = %e,
                    "status lookup failed, treating payment as not confirmed"
                );
                String::new()
            }
        }
    }
}
