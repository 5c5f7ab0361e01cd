//! # Configuration
//!
//! Layered server configuration.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. environment variables prefixed `MINESHARE__`, sections separated by
//!    `__` (for example `MINESHARE__SERVER__PORT=9000`)
//!
//! Call [`load_env_file`] first to pick up a `.env` file.

use crate::application::services::PollingConfig;
use crate::domain::services::FeeSchedule;
use crate::domain::value_objects::{Money, Percentage, SellingRules};
use ::config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "MINESHARE";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Log output.
    pub logging: LoggingConfig,
    /// Transfer fee schedule.
    pub transfer_fee: TransferFeeConfig,
    /// Sell order limits.
    pub selling_rules: SellingRulesConfig,
    /// Payment gateway polling cadence.
    pub payment_polling: PollingConfig,
    /// Serverless transfer endpoint; transfers are applied in-process when
    /// absent.
    #[serde(default)]
    pub transfer_callback: Option<TransferCallbackConfig>,
    /// Payment status endpoint; deposits against a payment reference are
    /// refused when absent.
    #[serde(default)]
    pub payment_status: Option<PaymentStatusConfig>,
    /// PostgreSQL event store; events stay in memory when absent.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

/// Log settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Emit JSON lines.
    pub json: bool,
}

/// Transfer fee: `percent` of the transfer value plus `flat`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransferFeeConfig {
    /// Percentage of the transfer value.
    pub percent: Decimal,
    /// Flat amount added to every fee.
    pub flat: Decimal,
}

/// Per-order sell limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SellingRulesConfig {
    /// Smallest order.
    pub min_quantity: u64,
    /// Largest order.
    pub max_quantity: u64,
}

/// Serverless transfer endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransferCallbackConfig {
    /// Endpoint URL.
    pub url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_callback_timeout_ms")]
    pub timeout_ms: u64,
    /// Bearer token sent with every call.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Serverless payment status endpoint, queried as `GET {url}/{reference}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaymentStatusConfig {
    /// Base URL.
    pub url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_callback_timeout_ms")]
    pub timeout_ms: u64,
    /// Bearer token sent with every call.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_callback_timeout_ms() -> u64 {
    10_000
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Maximum connections in the pool.
    pub max_connections: u32,
    /// Apply bundled migrations at startup.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_run_migrations() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
            transfer_fee: TransferFeeConfig {
                percent: Decimal::new(2, 0),
                flat: Decimal::new(1_000, 0),
            },
            selling_rules: SellingRulesConfig {
                min_quantity: 1,
                max_quantity: 1_000_000,
            },
            payment_polling: PollingConfig::default(),
            transfer_callback: None,
            payment_status: None,
            database: None,
        }
    }
}

impl LedgerConfig {
    /// Loads defaults, then `path` if given, then the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source is unreadable and
    /// `ConfigError::Invalid` if the result fails [`LedgerConfig::validate`].
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let defaults = Config::try_from(&Self::default())?;
        let mut builder = Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section converts to its domain type.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for the first offending value.
    pub fn validate(&self) -> ConfigResult<()> {
        self.fee_schedule()?;
        self.selling_rules()?;
        if self.payment_polling.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "payment_polling.interval_secs must be positive".to_string(),
            ));
        }
        if let Some(status) = &self.payment_status
            && status.url.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "payment_status.url must not be empty".to_string(),
            ));
        }
        if let Some(db) = &self.database
            && db.max_connections == 0
        {
            return Err(ConfigError::Invalid(
                "database.max_connections must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the transfer fee schedule.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a percentage outside 0..=100 or a
    /// negative flat fee.
    pub fn fee_schedule(&self) -> ConfigResult<FeeSchedule> {
        let percent = Percentage::new(self.transfer_fee.percent)
            .map_err(|e| ConfigError::Invalid(format!("transfer_fee.percent: {e}")))?;
        let flat = Money::new(self.transfer_fee.flat)
            .map_err(|e| ConfigError::Invalid(format!("transfer_fee.flat: {e}")))?;
        Ok(FeeSchedule::new(percent, flat))
    }

    /// Builds the sell order limits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `min_quantity` is zero or above
    /// `max_quantity`.
    pub fn selling_rules(&self) -> ConfigResult<SellingRules> {
        SellingRules::new(
            self.selling_rules.min_quantity,
            self.selling_rules.max_quantity,
        )
        .map_err(|e| ConfigError::Invalid(format!("selling_rules: {e}")))
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Loads `.env` into the process environment if present.
///
/// Returns whether a file was loaded.
pub fn load_env_file() -> bool {
    dotenvy::dotenv().is_ok()
}
