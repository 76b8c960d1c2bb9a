use anyhow::{Context, Result};
use config::{Config, File};
use core_logic::{ConfigError, RetryConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api2.blockpad.fun/api";

/// Token amount sent to the API.
///
/// Whole numbers go out as JSON integers (`10`, not `10.0`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub f64);

impl Serialize for Amount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Runtime settings. Every field has a default, so the settings file is optional.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BlockpadConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    /// Pause after every operation, whatever its outcome
    pub op_delay_ms: u64,
    /// Extra pause once a full cycle is done
    pub cycle_delay_ms: u64,
    pub cycle_error_delay_ms: u64,
    pub restart_delay_ms: u64,
    pub swap_from: String,
    pub swap_to: String,
    pub swap_amount: Amount,
    pub liquidity_amount: Amount,
    pub stake_token: String,
    pub stake_amount: Amount,
}

impl Default for BlockpadConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 30_000,
            max_attempts: 3,
            retry_delay_ms: 10_000,
            op_delay_ms: 5_000,
            cycle_delay_ms: 10_000,
            cycle_error_delay_ms: 30_000,
            restart_delay_ms: 60_000,
            swap_from: "tICE".to_string(),
            swap_to: "BPAD".to_string(),
            swap_amount: Amount(10.0),
            liquidity_amount: Amount(0.5),
            stake_token: "tICE".to_string(),
            stake_amount: Amount(100.0),
        }
    }
}

impl BlockpadConfig {
    /// Loads settings from `path`, falling back to defaults for anything
    /// missing. A missing file is not an error.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()
            .with_context(|| format!("Failed to read settings from {}", path))?;

        let config: Self = settings
            .try_deserialize()
            .with_context(|| format!("Invalid settings in {}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url".to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(())
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.max_attempts, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn op_delay(&self) -> Duration {
        Duration::from_millis(self.op_delay_ms)
    }

    pub fn cycle_delay(&self) -> Duration {
        Duration::from_millis(self.cycle_delay_ms)
    }

    pub fn cycle_error_delay(&self) -> Duration {
        Duration::from_millis(self.cycle_error_delay_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }
}
