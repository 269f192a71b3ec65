//! Error handling for the payment bridge HTTP surface
//!
//! Unified error type with HTTP status mapping, user-facing messages and
//! machine-readable codes. Webhook and browser-return endpoints never emit
//! these: they answer with `OK`/`FAIL` or a redirect no matter what.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::orders::OrderId;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    #[serde(rename = "ORDER_NOT_FOUND")]
    OrderNotFound,
    #[serde(rename = "GATEWAY_DISABLED")]
    GatewayDisabled,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    #[serde(rename = "VALIDATION_ERROR")]
    ValidationError,
}

/// Business rule violations
#[derive(Debug, Clone)]
pub enum DomainError {
    OrderNotFound { order_id: OrderId },
    GatewayDisabled,
}

/// Order store failures
#[derive(Debug, Clone)]
pub enum InfrastructureError {
    Database { message: String, is_retryable: bool },
}

/// Input validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Invalid { field: String, reason: String },
}

/// Unified application error type
#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub enum AppErrorKind {
    Domain(DomainError),
    Infrastructure(InfrastructureError),
    Validation(ValidationError),
}

impl AppError {
    pub fn new(kind: AppErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn order_not_found(order_id: OrderId) -> Self {
        Self::new(AppErrorKind::Domain(DomainError::OrderNotFound { order_id }))
    }

    /// Map error to HTTP status code
    pub fn status_code(&self) -> u16 {
        match &self.kind {
            AppErrorKind::Domain(DomainError::OrderNotFound { .. }) => 404,
            AppErrorKind::Domain(DomainError::GatewayDisabled) => 400,
            AppErrorKind::Infrastructure(_) => 500,
            AppErrorKind::Validation(_) => 400,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match &self.kind {
            AppErrorKind::Domain(DomainError::OrderNotFound { .. }) => ErrorCode::OrderNotFound,
            AppErrorKind::Domain(DomainError::GatewayDisabled) => ErrorCode::GatewayDisabled,
            AppErrorKind::Infrastructure(_) => ErrorCode::DatabaseError,
            AppErrorKind::Validation(_) => ErrorCode::ValidationError,
        }
    }

    pub fn user_message(&self) -> String {
        match &self.kind {
            AppErrorKind::Domain(DomainError::OrderNotFound { order_id }) => {
                format!("Order '{}' not found", order_id)
            }
            AppErrorKind::Domain(DomainError::GatewayDisabled) => {
                "Raiffeisen payment method is disabled".to_string()
            }
            AppErrorKind::Infrastructure(_) => {
                "Service temporarily unavailable. Please try again later".to_string()
            }
            AppErrorKind::Validation(ValidationError::Invalid { field, reason }) => {
                format!("Invalid value for '{}': {}", field, reason)
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        match &self.kind {
            AppErrorKind::Infrastructure(InfrastructureError::Database { is_retryable, .. }) => {
                *is_retryable
            }
            AppErrorKind::Domain(_) | AppErrorKind::Validation(_) => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AppErrorKind::Infrastructure(InfrastructureError::Database { message, .. }) => {
                write!(f, "database error: {}", message)?
            }
            _ => write!(f, "{}", self.user_message())?,
        }
        if let Some(context) = &self.context {
            write!(f, " ({})", context)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let id = OrderId::new(7).expect("positive id");
        assert_eq!(AppError::order_not_found(id).status_code(), 404);
        assert_eq!(
            AppError::new(AppErrorKind::Domain(DomainError::GatewayDisabled)).status_code(),
            400
        );
        assert_eq!(
            AppError::new(AppErrorKind::Infrastructure(InfrastructureError::Database {
                message: "down".to_string(),
                is_retryable: true,
            }))
            .status_code(),
            500
        );
    }

    #[test]
    fn test_user_message_hides_internal_details() {
        let err = AppError::new(AppErrorKind::Infrastructure(InfrastructureError::Database {
            message: "password authentication failed for user shop".to_string(),
            is_retryable: false,
        }));
        assert!(!err.user_message().contains("password"));
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_display_appends_context() {
        let id = OrderId::new(7).expect("positive id");
        let err = AppError::order_not_found(id).with_context("checkout");
        assert_eq!(err.to_string(), "Order '7' not found (checkout)");
        assert_eq!(err.error_code(), ErrorCode::OrderNotFound);
    }
}
