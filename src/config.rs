//! Environment-driven settings for the bridge: listener, logging, bank
//! gateway, shop URLs and the optional order database.

use std::env;

use crate::payments::providers::raiffeisen::{DEFAULT_API_BASE_URL, DEFAULT_SDK_URL};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub gateway: GatewayConfig,
    pub store: StoreConfig,
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log format options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Plain,
}

/// Payment method settings as the shop administrator sets them.
#[derive(Clone)]
pub struct GatewayConfig {
    pub enabled: bool,
    pub title: String,
    pub description: String,
    /// Merchant id, sent as the bearer token of status requests.
    pub secret_key: String,
    /// Terminal id, embedded in the payment page.
    pub public_key: String,
    pub api_base_url: String,
    pub sdk_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "Raiffeisen Bank.".to_string(),
            description: String::new(),
            secret_key: String::new(),
            public_key: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            sdk_url: DEFAULT_SDK_URL.to_string(),
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("enabled", &self.enabled)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("secret_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .field("api_base_url", &self.api_base_url)
            .field("sdk_url", &self.sdk_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Shop URLs the bridge redirects to or builds links from.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Public base URL of this service as seen by browsers and the bank.
    pub public_url: String,
    pub success_url: String,
    pub cart_url: String,
}

impl StoreConfig {
    pub fn with_public_url(public_url: &str) -> Self {
        let public_url = public_url.trim_end_matches('/').to_string();
        Self {
            success_url: format!("{}/checkout/order-received/", public_url),
            cart_url: format!("{}/cart/", public_url),
            public_url,
        }
    }

    pub fn receipt_page_url(&self, order_id: crate::orders::OrderId) -> String {
        format!("{}/checkout/{}/pay", self.public_url, order_id)
    }

    pub fn success_processing_url(&self, order_id: crate::orders::OrderId) -> String {
        format!(
            "{}/wc-api/raiffeisen_success?orderId={}",
            self.public_url, order_id
        )
    }

    pub fn callback_processing_url(&self) -> String {
        format!("{}/wc-api/raiffeisen_callback", self.public_url)
    }

    pub fn cancel_order_url(&self, order_id: crate::orders::OrderId) -> String {
        let separator = if self.cart_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}cancel_order=true&order_id={}",
            self.cart_url, separator, order_id
        )
    }
}

/// Database configuration; no URL means the in-memory order store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64, // seconds
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv().ok();

        Ok(AppConfig {
            server: ServerConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
            gateway: GatewayConfig::from_env()?,
            store: StoreConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
        })
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logging.validate()?;
        self.gateway.validate()?;
        self.store.validate()?;
        self.database.validate()?;

        Ok(())
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue(
                "SERVER_PORT cannot be 0".to_string(),
            ));
        }

        if self.host.is_empty() {
            return Err(ConfigError::InvalidValue(
                "SERVER_HOST cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "plain".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Plain,
            },
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
        if !valid_levels.contains(&self.level.to_uppercase().as_str()) {
            return Err(ConfigError::InvalidValue("LOG_LEVEL".to_string()));
        }

        Ok(())
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = GatewayConfig::default();
        Ok(GatewayConfig {
            enabled: parse_flag("RAIFFEISEN_ENABLED", defaults.enabled)?,
            title: env::var("RAIFFEISEN_TITLE").unwrap_or(defaults.title),
            description: env::var("RAIFFEISEN_DESCRIPTION").unwrap_or(defaults.description),
            secret_key: env::var("RAIFFEISEN_SECRET_KEY")
                .map_err(|_| ConfigError::MissingVariable("RAIFFEISEN_SECRET_KEY".to_string()))?,
            public_key: env::var("RAIFFEISEN_PUBLIC_KEY")
                .map_err(|_| ConfigError::MissingVariable("RAIFFEISEN_PUBLIC_KEY".to_string()))?,
            api_base_url: env::var("RAIFFEISEN_API_BASE_URL").unwrap_or(defaults.api_base_url),
            sdk_url: env::var("RAIFFEISEN_SDK_URL").unwrap_or(defaults.sdk_url),
            timeout_secs: env::var("RAIFFEISEN_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.timeout_secs.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RAIFFEISEN_TIMEOUT_SECS".to_string()))?,
            max_retries: env::var("RAIFFEISEN_MAX_RETRIES")
                .unwrap_or_else(|_| defaults.max_retries.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RAIFFEISEN_MAX_RETRIES".to_string()))?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "RAIFFEISEN_SECRET_KEY cannot be empty".to_string(),
            ));
        }

        if self.public_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "RAIFFEISEN_PUBLIC_KEY cannot be empty".to_string(),
            ));
        }

        validate_http_url("RAIFFEISEN_API_BASE_URL", &self.api_base_url)?;
        validate_http_url("RAIFFEISEN_SDK_URL", &self.sdk_url)?;

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "RAIFFEISEN_TIMEOUT_SECS".to_string(),
            ));
        }

        if self.max_retries > 5 {
            return Err(ConfigError::InvalidValue(
                "RAIFFEISEN_MAX_RETRIES must be <= 5".to_string(),
            ));
        }

        Ok(())
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let public_url =
            env::var("STORE_PUBLIC_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let defaults = StoreConfig::with_public_url(&public_url);

        Ok(StoreConfig {
            success_url: env::var("STORE_SUCCESS_URL").unwrap_or(defaults.success_url),
            cart_url: env::var("STORE_CART_URL").unwrap_or(defaults.cart_url),
            public_url: defaults.public_url,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("STORE_PUBLIC_URL", &self.public_url)?;
        validate_http_url("STORE_SUCCESS_URL", &self.success_url)?;
        validate_http_url("STORE_CART_URL", &self.cart_url)?;

        Ok(())
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(DatabaseConfig {
            url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,
            connection_timeout: env::var("DB_CONNECTION_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_CONNECTION_TIMEOUT".to_string()))?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(())
    }
}

fn parse_flag(name: &str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue(name.to_string())),
        },
    }
}

fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::InvalidValue(format!(
            "{} must be a valid URL",
            name
        )));
    }
    Ok(())
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),

    #[error("Invalid value for configuration: {0}")]
    InvalidValue(String),
}
