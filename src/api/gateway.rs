use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::GatewayConfig;

pub const GATEWAY_ID: &str = "wc_rpg";

/// Customer-facing description of the payment method. Keys are never included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayDescriptor {
    pub id: String,
    pub title: String,
    pub description: String,
    pub enabled: bool,
}

impl From<&GatewayConfig> for GatewayDescriptor {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            id: GATEWAY_ID.to_string(),
            title: config.title.clone(),
            description: config.description.clone(),
            enabled: config.enabled,
        }
    }
}

/// GET /api/gateway
pub async fn get_gateway(State(descriptor): State<Arc<GatewayDescriptor>>) -> Json<GatewayDescriptor> {
    Json(descriptor.as_ref().clone())
}
