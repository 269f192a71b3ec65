use super::{Order, OrderId, OrderStatus, OrderStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Process-local order store used when no database is configured.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let map = orders.into_iter().map(|o| (o.id, o)).collect();
        Self {
            orders: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_order(&self, order_id: OrderId) -> StoreResult<Option<Order>> {
        Ok(self.orders.read().await.get(&order_id).cloned())
    }

    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> StoreResult<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(StoreError::NotFound(order_id))?;
        if order.status != status {
            info!(
                order_id = %order_id,
                from = %order.status,
                to = %status,
                "order status updated"
            );
            order.status = status;
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::BillingContact;
    use rust_decimal_macros::dec;

    fn order(id: i64, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id).expect("positive id"),
            total: dec!(100),
            billing: BillingContact::default(),
            items: vec![],
            status,
        }
    }

    #[tokio::test]
    async fn update_status_is_idempotent() {
        let store = InMemoryOrderStore::with_orders([order(1, OrderStatus::Pending)]);
        let id = OrderId::new(1).expect("positive id");

        store
            .update_status(id, OrderStatus::Completed)
            .await
            .expect("first update");
        store
            .update_status(id, OrderStatus::Completed)
            .await
            .expect("second update");

        let stored = store.find_order(id).await.expect("lookup").expect("order");
        assert_eq!(stored.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn update_status_of_unknown_order_fails() {
        let store = InMemoryOrderStore::new();
        let id = OrderId::new(9).expect("positive id");
        let err = store
            .update_status(id, OrderStatus::Completed)
            .await
            .expect_err("unknown order");
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
