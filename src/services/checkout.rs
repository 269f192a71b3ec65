use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::config::StoreConfig;
use crate::error::{AppError, AppErrorKind, DomainError};
use crate::orders::{OrderId, OrderStore};

/// Answer to "start payment": send the shopper to the receipt page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutRedirect {
    pub result: String,
    pub redirect: String,
}

pub struct CheckoutService {
    store: Arc<dyn OrderStore>,
    urls: StoreConfig,
    enabled: bool,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn OrderStore>, urls: StoreConfig, enabled: bool) -> Self {
        Self {
            store,
            urls,
            enabled,
        }
    }

    pub async fn process_payment(&self, order_id: OrderId) -> Result<CheckoutRedirect, AppError> {
        if !self.enabled {
            return Err(AppError::new(AppErrorKind::Domain(DomainError::GatewayDisabled)));
        }

        if self.store.find_order(order_id).await?.is_none() {
            return Err(AppError::order_not_found(order_id).with_context("process_payment"));
        }

        let redirect = self.urls.receipt_page_url(order_id);
        info!(order_id = %order_id, redirect = %redirect, "payment started");

        Ok(CheckoutRedirect {
            result: "success".to_string(),
            redirect,
        })
    }
}
