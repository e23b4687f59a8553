//! Application settings and logging setup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::expiry::{ExpiryError, ExpiryPolicy, Horizon};

/// Application-level constants
pub const APP_NAME: &str = "Pillbox";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "PILLBOX_LOG";
pub const HORIZON_MONTHS_ENV: &str = "PILLBOX_HORIZON_MONTHS";
pub const HORIZON_DAYS_ENV: &str = "PILLBOX_HORIZON_DAYS";
pub const DB_PATH_ENV: &str = "PILLBOX_DB_PATH";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },

    #[error(transparent)]
    Expiry(#[from] ExpiryError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// User-adjustable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Expiring-soon window
    pub expiry_horizon: Horizon,
    /// Whether medicines with no units left still raise alerts
    pub alert_empty_stock: bool,
    /// SQLite file; in-memory when unset
    pub database_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let policy = ExpiryPolicy::default();
        Self {
            expiry_horizon: policy.horizon,
            alert_empty_stock: policy.alert_empty_stock,
            database_path: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`. A day horizon wins over a month horizon.
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(HORIZON_MONTHS_ENV) {
            self.expiry_horizon = Horizon::months(parse_count(HORIZON_MONTHS_ENV, &value)?)?;
        }
        if let Some(value) = lookup(HORIZON_DAYS_ENV) {
            self.expiry_horizon = Horizon::days(parse_count(HORIZON_DAYS_ENV, &value)?)?;
        }
        if let Some(value) = lookup(DB_PATH_ENV) {
            if !value.trim().is_empty() {
                self.database_path = Some(PathBuf::from(value.trim()));
            }
        }
        Ok(self)
    }

    /// Classification policy for these settings.
    pub fn policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::new(self.expiry_horizon).with_alert_empty_stock(self.alert_empty_stock)
    }
}

fn parse_count(name: &str, value: &str) -> ConfigResult<i64> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Default log filter when neither `PILLBOX_LOG` nor `RUST_LOG` is set.
pub fn default_log_filter() -> &'static str {
    "pillbox_core=info,pillbox_llm=info"
}

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter()));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok() {
        tracing::info!("{} starting v{}", APP_NAME, APP_VERSION);
    }
}
