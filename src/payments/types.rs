use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Bank statuses that confirm a payment. Matching is exact and case-sensitive.
pub const SUCCESS_STATUSES: [&str; 2] = ["PAID", "SUCCESS"];

/// Tax category attached to every receipt line.
pub const DEFAULT_VAT_TYPE: &str = "VAT20";

pub fn is_success(status: &str) -> bool {
    SUCCESS_STATUSES.contains(&status)
}

/// Classification of the raw bank status string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Success,
    NotSuccessful,
}

impl PaymentState {
    pub fn from_bank_status(status: &str) -> Self {
        if is_success(status) {
            PaymentState::Success
        } else {
            PaymentState::NotSuccessful
        }
    }
}

/// `status.value` of a `GET /api/payment/v1/orders/{orderId}` body. Anything
/// that is not an object carrying a string there has no status.
pub fn bank_status_value(body: &JsonValue) -> Option<&str> {
    body.pointer("/status/value").and_then(JsonValue::as_str)
}

/// Arguments of `PaymentPageSdk.openPopup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupPaymentParams {
    pub public_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub order_id: String,
    pub success_url: String,
    pub fail_url: String,
    pub comment: String,
    pub receipt: Receipt,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub receipt_number: String,
    pub customer: ReceiptCustomer,
    pub items: Vec<ReceiptItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptCustomer {
    pub email: String,
    pub phone: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub vat_type: String,
}
