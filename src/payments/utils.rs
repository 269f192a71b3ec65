use crate::payments::error::{PaymentError, PaymentResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct PaymentHttpClient {
    client: Client,
    timeout: Duration,
    max_retries: u32,
}

impl PaymentHttpClient {
    pub fn new(timeout: Duration, max_retries: u32) -> PaymentResult<Self> {
        let client =
            Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| PaymentError::NetworkError {
                    message: format!("failed to initialize HTTP client: {}", e),
                })?;

        Ok(Self {
            client,
            timeout,
            max_retries,
        })
    }

    /// GET a JSON document. Network errors, 429 and 5xx are retried up to
    /// `max_retries` times with exponential backoff.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        additional_headers: &[(&str, &str)],
    ) -> PaymentResult<T> {
        let text = self.get_text(url, bearer_token, additional_headers).await?;
        serde_json::from_str::<T>(&text).map_err(|e| PaymentError::ProviderError {
            provider: "http".to_string(),
            message: format!("invalid provider JSON response: {}", e),
            provider_code: None,
            retryable: false,
        })
    }

    pub async fn get_text(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        additional_headers: &[(&str, &str)],
    ) -> PaymentResult<String> {
        let mut attempt = 0;
        loop {
            let outcome = self.send_once(url, bearer_token, additional_headers).await;
            match outcome {
                Ok(body) => {
                    debug!(url = %url, attempt = attempt + 1, "provider request succeeded");
                    return Ok(body);
                }
                Err(err) if attempt < self.max_retries && err.is_retryable() => {
                    let delay = retry_delay(&err, attempt);
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        error_kind = err.kind(),
                        delay_secs = delay.as_secs(),
                        "provider request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        additional_headers: &[(&str, &str)],
    ) -> PaymentResult<String> {
        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }
        for (name, value) in additional_headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| PaymentError::NetworkError {
            message: format!("provider request failed: {}", e),
        })?;

        let status = response.status();
        let retry_after_seconds = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let body = response.text().await.unwrap_or_default();
        if status.is_success() {
            return Ok(body);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PaymentError::RateLimitError {
                message: "provider rate limit exceeded".to_string(),
                retry_after_seconds,
            });
        }

        Err(PaymentError::ProviderError {
            provider: "http".to_string(),
            message: format!("HTTP {}: {}", status, body),
            provider_code: Some(status.as_u16().to_string()),
            retryable: status.is_server_error(),
        })
    }
}

const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt.min(5))
}

/// Only the delta-seconds form of `Retry-After` is honored.
fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn retry_delay(err: &PaymentError, attempt: u32) -> Duration {
    match err.retry_after() {
        Some(wait) => wait.min(MAX_RETRY_AFTER),
        None => backoff(attempt),
    }
}
