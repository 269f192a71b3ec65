use thiserror::Error;

pub type PaymentResult<T> = Result<T, PaymentError>;

#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimitError {
        message: String,
        retry_after_seconds: Option<u64>,
    },

    #[error("Provider error: provider={provider}, code={}, message={message}", provider_code.as_deref().unwrap_or("-"))]
    ProviderError {
        provider: String,
        message: String,
        provider_code: Option<String>,
        retryable: bool,
    },
}

impl PaymentError {
    pub fn is_retryable(&self) -> bool {
        match self {
            PaymentError::ValidationError { .. } => false,
            PaymentError::NetworkError { .. } => true,
            PaymentError::RateLimitError { .. } => true,
            PaymentError::ProviderError { retryable, .. } => *retryable,
        }
    }

    /// Wait requested by the provider before the next attempt.
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            PaymentError::RateLimitError {
                retry_after_seconds: Some(seconds),
                ..
            } => Some(std::time::Duration::from_secs(*seconds)),
            _ => None,
        }
    }

    /// Short label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PaymentError::ValidationError { .. } => "validation",
            PaymentError::NetworkError { .. } => "network",
            PaymentError::RateLimitError { .. } => "rate_limit",
            PaymentError::ProviderError { .. } => "provider",
        }
    }
}
