//! Connector configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BRIDGE_DATABASE_URL` - `PostgreSQL` connection string for the store's
//!   read model (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `BRIDGE_HOST` - Bind address (default: 127.0.0.1)
//! - `BRIDGE_PORT` - Listen port (default: 3000)
//! - `BRIDGE_API_TOKEN` - Standing API token honored while the API is enabled
//! - `BRIDGE_PROVISION_TOKEN` - Single-use provisioning token for initial setup
//! - `BRIDGE_API_ENABLED` - Whether API access is enabled (default: false)
//! - `BRIDGE_STORE_CURRENCY` - Store display currency code (default: USD)
//! - `BRIDGE_ORDER_LIMIT` - Max orders returned per report (default: 5)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::sync::{Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use zendesk_bridge_core::CurrencyCode;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connector application configuration.
#[derive(Debug)]
pub struct BridgeConfig {
    /// `PostgreSQL` connection URL for the store read model (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Standing API token, honored while [`api_enabled`](Self::api_enabled) is true
    pub api_token: Option<SecretString>,
    /// Single-use provisioning token for the setup flow
    pub provision_token: Option<SecretString>,
    /// Whether API access is enabled
    pub api_enabled: bool,
    /// Store display currency
    pub currency: CurrencyCode,
    /// Maximum number of orders returned per report
    pub order_limit: i64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl BridgeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("BRIDGE_DATABASE_URL")?;
        let host = get_env_or_default("BRIDGE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BRIDGE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BRIDGE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BRIDGE_PORT".to_string(), e.to_string()))?;

        let api_token = get_optional_secret("BRIDGE_API_TOKEN");
        let provision_token = get_optional_secret("BRIDGE_PROVISION_TOKEN");
        let api_enabled = get_bool_or_default("BRIDGE_API_ENABLED", false)?;

        let currency = get_env_or_default("BRIDGE_STORE_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BRIDGE_STORE_CURRENCY".to_string(), e.to_string())
            })?;
        let order_limit = get_env_or_default("BRIDGE_ORDER_LIMIT", "5")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BRIDGE_ORDER_LIMIT".to_string(), e.to_string())
            })?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            api_token,
            provision_token,
            api_enabled,
            currency,
            order_limit,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Build the authorization settings snapshot handed to the authorizer.
    #[must_use]
    pub fn api_access(&self) -> ApiAccess {
        ApiAccess::new(
            self.api_enabled,
            self.api_token.clone(),
            self.provision_token.clone(),
        )
    }
}

/// Authorization settings for the bridge API.
///
/// The enabled flag and API token are immutable for the life of the
/// process. The provisioning token is a single-use credential: the
/// authorizer invalidates it through [`Self::consume_provision_token`] on
/// first successful match, so a second request presenting the same token
/// is refused.
pub struct ApiAccess {
    enabled: bool,
    api_token: Option<SecretString>,
    provision_token: Mutex<Option<SecretString>>,
}

impl ApiAccess {
    /// Create authorization settings from configuration values.
    #[must_use]
    pub fn new(
        enabled: bool,
        api_token: Option<SecretString>,
        provision_token: Option<SecretString>,
    ) -> Self {
        Self {
            enabled,
            api_token,
            provision_token: Mutex::new(provision_token),
        }
    }

    /// Whether API access is enabled.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the given token equals the configured API token.
    #[must_use]
    pub fn api_token_matches(&self, token: &str) -> bool {
        self.api_token
            .as_ref()
            .is_some_and(|t| t.expose_secret() == token)
    }

    /// Check the given token against the provisioning token and, on a
    /// match, clear the stored token so it cannot be used again.
    ///
    /// Returns `true` when the token matched a still-present provisioning
    /// token.
    pub fn consume_provision_token(&self, token: &str) -> bool {
        let mut slot = self
            .provision_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let matches = slot
            .as_ref()
            .is_some_and(|t| t.expose_secret() == token);
        if matches {
            *slot = None;
        }
        matches
    }
}

impl std::fmt::Debug for ApiAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiAccess")
            .field("enabled", &self.enabled)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("provision_token", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an optional environment variable as a secret, ignoring empty values.
fn get_optional_secret(key: &str) -> Option<SecretString> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a boolean environment variable with a default value.
///
/// Accepts `true`/`false`/`1`/`0` (case-insensitive).
fn get_bool_or_default(key: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(value) => match value.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected true/false/1/0, got {other}"),
            )),
        },
    }
}
