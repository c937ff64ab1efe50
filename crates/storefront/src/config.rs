//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VINTAGE_CART_PATH` - File holding the durable cart (default: .vintage/cart.json)
//! - `VINTAGE_STORE_PATH` - File-backed document store snapshot (default: .vintage/store.json)
//! - `VINTAGE_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_CART_PATH: &str = ".vintage/cart.json";
const DEFAULT_STORE_PATH: &str = ".vintage/store.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Local slot file for the cart
    pub cart_path: PathBuf,
    /// Snapshot file of the document store
    pub store_path: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            cart_path: PathBuf::from(DEFAULT_CART_PATH),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            log_format: LogFormat::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_format = match non_empty(lookup("VINTAGE_LOG_FORMAT")) {
            Some(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("VINTAGE_LOG_FORMAT".to_string(), e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            cart_path: non_empty(lookup("VINTAGE_CART_PATH"))
                .map_or_else(|| PathBuf::from(DEFAULT_CART_PATH), PathBuf::from),
            store_path: non_empty(lookup("VINTAGE_STORE_PATH"))
                .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from),
            log_format,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Treat empty values the same as unset ones.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
