//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_PATH` - JSON file holding the key-value store (default: cart.json)
//! - `CART_STORAGE_KEY` - Key the cart is stored under (default: cart)
//! - `CART_LOG_FORMAT` - `text` or `json` (default: text)
//! - `RUST_LOG` - Log filter (default: info)

use std::path::PathBuf;
use std::str::FromStr;

use cartkeeper_core::CART_STORAGE_KEY;
use thiserror::Error;

const DEFAULT_STORAGE_PATH: &str = "cart.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("invalid log format: {s} (expected text or json)")),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// File backing the key-value store
    pub storage_path: PathBuf,
    /// Key the cart blob lives under
    pub storage_key: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl CliConfig {
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

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_path = lookup("CART_STORAGE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from);

        let storage_key = lookup("CART_STORAGE_KEY")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| CART_STORAGE_KEY.to_string());

        let log_format = match lookup("CART_LOG_FORMAT") {
            Some(value) => value
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::InvalidEnvVar("CART_LOG_FORMAT".to_string(), e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            storage_path,
            storage_key,
            log_format,
        })
    }
}
