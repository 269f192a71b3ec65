//! Raiffeisen e-commerce API client.
//!
//! Only two calls are made against the bank: the order status lookup used to
//! confirm payments server-side, and the download of the hosted payment page SDK.

use crate::config::GatewayConfig;
use crate::orders::OrderId;
use crate::payments::error::{PaymentError, PaymentResult};
use crate::payments::provider::PaymentStatusProvider;
use crate::payments::types::bank_status_value;
use crate::payments::utils::PaymentHttpClient;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_API_BASE_URL: &str = "https://e-commerce.raiffeisen.ru";
pub const DEFAULT_SDK_URL: &str = "https://pay.raif.ru/pay/sdk/v2/payment.styled.js";

pub struct RaiffeisenProvider {
    config: GatewayConfig,
    http: PaymentHttpClient,
}

impl RaiffeisenProvider {
    pub fn new(config: GatewayConfig) -> PaymentResult<Self> {
        if config.secret_key.trim().is_empty() {
            return Err(PaymentError::ValidationError {
                message: "RAIFFEISEN_SECRET_KEY is required".to_string(),
            });
        }
        let http =
            PaymentHttpClient::new(Duration::from_secs(config.timeout_secs), config.max_retries)?;
        Ok(Self { config, http })
    }

    pub fn order_status_url(&self, order_id: OrderId) -> String {
        format!(
            "{}/api/payment/v1/orders/{}",
            self.config.api_base_url.trim_end_matches('/'),
            order_id
        )
    }

    /// Downloads the hosted payment page SDK so it can be inlined into the receipt page.
    pub async fn fetch_sdk_script(&self) -> PaymentResult<String> {
        let script = self.http.get_text(&self.config.sdk_url, None, &[]).await?;
        debug!(bytes = script.len(), "payment SDK downloaded");
        Ok(script)
    }

    pub fn sdk_url(&self) -> &str {
        &self.config.sdk_url
    }
}

#[async_trait]
impl PaymentStatusProvider for RaiffeisenProvider {
    async fn fetch_order_status(&self, order_id: OrderId) -> PaymentResult<Option<String>> {
        let body: JsonValue = self
            .http
            .get_json(
                &self.order_status_url(order_id),
                Some(&self.config.secret_key),
                &[("Content-Type", "application/json")],
            )
            .await?;

        let status = bank_status_value(&body).map(str::to_string);
        info!(
            order_id = %order_id,
            status = status.as_deref().unwrap_or(""),
            "raiffeisen order status fetched"
        );
        Ok(status)
    }

    fn name(&self) -> &'static str {
        "raiffeisen"
    }
}
