//! Shop order model as seen by the payment bridge.
//!
//! Orders belong to the shop. The bridge reads them and performs a single
//! status transition, through the [`OrderStore`] trait.

pub mod memory;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use thiserror::Error;

pub use memory::InMemoryOrderStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    /// Order ids are positive; zero and negatives count as "no order".
    pub fn new(value: i64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Lenient integer coercion of a JSON value: integers, integral floats and
    /// numeric strings are accepted.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .and_then(Self::new),
            JsonValue::String(s) => Self::parse(s),
            _ => None,
        }
    }

    /// Parses a query string or JSON string value. Blank and non-numeric
    /// input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        raw.parse::<i64>()
            .ok()
            .or_else(|| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
            .and_then(Self::new)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::OnHold => "on-hold",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "on-hold" | "on_hold" => Ok(OrderStatus::OnHold),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "refunded" => Ok(OrderStatus::Refunded),
            "failed" => Ok(OrderStatus::Failed),
            other => Err(StoreError::InvalidData(format!(
                "unknown order status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingContact {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

impl BillingContact {
    /// Customer name in "last first" order, as printed on fiscal receipts.
    pub fn receipt_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub total: Decimal,
    pub billing: BillingContact,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
}

impl Order {
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    NotFound(OrderId),
    #[error("Invalid order data: {0}")]
    InvalidData(String),
    #[error("Database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for crate::error::AppError {
    fn from(err: StoreError) -> Self {
        use crate::error::{AppError, AppErrorKind, DomainError, InfrastructureError};

        match err {
            StoreError::NotFound(order_id) => {
                AppError::new(AppErrorKind::Domain(DomainError::OrderNotFound { order_id }))
            }
            other => AppError::new(AppErrorKind::Infrastructure(
                InfrastructureError::Database {
                    message: other.to_string(),
                    is_retryable: matches!(other, StoreError::Database(_)),
                },
            )),
        }
    }
}

/// Access to the shop's orders.
///
/// `update_status` must be idempotent: setting the status an order already
/// has succeeds without side effects.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_order(&self, order_id: OrderId) -> StoreResult<Option<Order>>;

    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> StoreResult<()>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_id_rejects_non_positive() {
        assert!(OrderId::new(0).is_none());
        assert!(OrderId::new(-5).is_none());
        assert_eq!(OrderId::new(1042).map(|id| id.value()), Some(1042));
    }

    #[test]
    fn order_id_from_json_is_lenient() {
        assert_eq!(OrderId::from_json(&json!(1042)), OrderId::new(1042));
        assert_eq!(OrderId::from_json(&json!("1042")), OrderId::new(1042));
        assert_eq!(OrderId::from_json(&json!(" 77 ")), OrderId::new(77));
        assert_eq!(OrderId::from_json(&json!(12.9)), OrderId::new(12));

        for missing in [
            json!(null),
            json!(0),
            json!(""),
            json!("abc"),
            json!("12abc"),
            json!(true),
            json!(false),
            json!({}),
        ] {
            assert!(OrderId::from_json(&missing).is_none(), "{} must be missing", missing);
        }
    }

    #[test]
    fn order_status_round_trips_through_strings() {
        assert_eq!(OrderStatus::from_str("on-hold").ok(), Some(OrderStatus::OnHold));
        assert_eq!(OrderStatus::from_str("COMPLETED").ok(), Some(OrderStatus::Completed));
        assert_eq!(OrderStatus::Completed.to_string(), "completed");
        assert!(OrderStatus::from_str("shipped").is_err());
    }

    #[test]
    fn receipt_name_puts_last_name_first() {
        let billing = BillingContact {
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            ..BillingContact::default()
        };
        assert_eq!(billing.receipt_name(), "Petrov Ivan");
        assert_eq!(BillingContact::default().receipt_name(), "");
    }
}
