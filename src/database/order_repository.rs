use crate::database::{health_check, store_error};
use crate::orders::{
    BillingContact, Order, OrderId, OrderItem, OrderStatus, OrderStore, StoreError, StoreResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, FromRow)]
struct OrderRow {
    id: i64,
    total: Decimal,
    status: String,
    billing_first_name: String,
    billing_last_name: String,
    billing_phone: String,
    billing_email: String,
}

#[derive(Debug, Clone, FromRow)]
struct OrderItemRow {
    name: String,
    unit_price: Decimal,
    quantity: i32,
    line_total: Decimal,
}

impl OrderItemRow {
    fn into_item(self) -> StoreResult<OrderItem> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            StoreError::InvalidData(format!("negative quantity for item '{}'", self.name))
        })?;
        Ok(OrderItem {
            name: self.name,
            unit_price: self.unit_price,
            quantity,
            line_total: self.line_total,
        })
    }
}

/// Orders stored in the shop's PostgreSQL database (`orders`, `order_items`).
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn find_order(&self, order_id: OrderId) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, total, status, billing_first_name, billing_last_name, billing_phone, billing_email
             FROM orders
             WHERE id = $1",
        )
        .bind(order_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT name, unit_price, quantity, line_total
             FROM order_items
             WHERE order_id = $1
             ORDER BY position ASC",
        )
        .bind(order_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?
        .into_iter()
        .map(OrderItemRow::into_item)
        .collect::<StoreResult<Vec<_>>>()?;

        let id = OrderId::new(row.id)
            .ok_or_else(|| StoreError::InvalidData(format!("invalid order id {}", row.id)))?;

        Ok(Some(Order {
            id,
            total: row.total,
            billing: BillingContact {
                first_name: row.billing_first_name,
                last_name: row.billing_last_name,
                phone: row.billing_phone,
                email: row.billing_email,
            },
            items,
            status: OrderStatus::from_str(&row.status)?,
        }))
    }

    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> StoreResult<()> {
        // The status predicate keeps repeated transitions from touching updated_at.
        let result = sqlx::query(
            "UPDATE orders
             SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status <> $2",
        )
        .bind(order_id.value())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() > 0 {
            info!(order_id = %order_id, to = %status, "order status updated");
            return Ok(());
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM orders WHERE id = $1")
            .bind(order_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        match exists {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(order_id)),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await
    }
}
