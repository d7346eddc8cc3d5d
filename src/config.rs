//! Environment-derived configuration
//!
//! All configuration is read once at startup into explicit structs and
//! passed down by value; nothing reads the environment at request time.

use std::env;

/// Get the current environment (production, sandbox, development)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

/// Credentials and endpoint for the exchange REST API.
///
/// All three fields are required for signed (account) requests; the
/// public ticker endpoint only needs `base_url`.
#[derive(Debug, Clone, Default)]
pub struct ExchangeConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
}

impl ExchangeConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("BINANCE_END_POINT").unwrap_or_default(),
            api_key: env::var("BINANCE_API_KEY").unwrap_or_default(),
            api_secret: env::var("BINANCE_API_SECRET").unwrap_or_default(),
        }
    }

    /// Names of required fields that are empty or unset.
    ///
    /// Field names only, never values - this list ends up in logs and
    /// error payloads.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.base_url.is_empty() {
            missing.push("BINANCE_END_POINT");
        }
        if self.api_key.is_empty() {
            missing.push("BINANCE_API_KEY");
        }
        if self.api_secret.is_empty() {
            missing.push("BINANCE_API_SECRET");
        }
        missing
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub exchange: ExchangeConfig,
    /// Connection string for the strategy store; dashboard endpoints
    /// return 503 when unset.
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Self {
            port,
            environment: get_environment(),
            exchange: ExchangeConfig::from_env(),
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
        }
    }
}
