//! Configuration types for price-monitor

use crate::feed::{Feed, FeedRegistry, RegistryError, DEFAULT_DEVIATION};
use crate::telemetry::LogFormat;
use crate::ws::{
    RetryPolicy, ValidatorEndpoints, WsError, DEFAULT_MONITOR_PATH, DEFAULT_REPLY_TIMEOUT,
    DEFAULT_UPDATE_PATH,
};
use serde::Deserialize;
use std::time::Duration;

/// Environment variable holding the validator base URI
pub const VALIDATOR_ENV: &str = "ORCFAX_VALIDATOR";

/// Configuration used when no config file is present
pub const DEFAULT_CONFIG: &str = include_str!("../config.toml.example");

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub validator: ValidatorConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Price validator service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorConfig {
    /// Base URI, e.g. "wss://validator.example/ws/"
    #[serde(default)]
    pub base_uri: Option<String>,

    /// Sub-path polled for price pairs
    #[serde(default = "default_monitor_path")]
    pub monitor_path: String,

    /// Sub-path receiving update requests
    #[serde(default = "default_update_path")]
    pub update_path: String,

    /// Seconds an exchange may take before the connection counts as dropped
    #[serde(default = "default_reply_timeout_secs")]
    pub reply_timeout_secs: u64,
}

fn default_monitor_path() -> String {
    DEFAULT_MONITOR_PATH.to_string()
}
fn default_update_path() -> String {
    DEFAULT_UPDATE_PATH.to_string()
}
fn default_reply_timeout_secs() -> u64 {
    DEFAULT_REPLY_TIMEOUT.as_secs()
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            base_uri: None,
            monitor_path: default_monitor_path(),
            update_path: default_update_path(),
            reply_timeout_secs: default_reply_timeout_secs(),
        }
    }
}

impl ValidatorConfig {
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.reply_timeout_secs)
    }

    /// Derive the endpoint URIs. A missing base URI can never be connected
    /// to and is reported as an invalid endpoint.
    pub fn endpoints(&self) -> Result<ValidatorEndpoints, WsError> {
        match self.base_uri.as_deref().map(str::trim) {
            Some(base) if !base.is_empty() => Ok(ValidatorEndpoints::with_paths(
                base,
                &self.monitor_path,
                &self.update_path,
            )),
            _ => Err(WsError::InvalidEndpoint {
                uri: String::new(),
                reason: format!("{} is not set (`export {}=wss://...`)", VALIDATOR_ENV, VALIDATOR_ENV),
            }),
        }
    }
}

/// Polling loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between poll cycles
    #[serde(default = "default_polling_interval_secs")]
    pub polling_interval_secs: u64,

    /// Threshold (%) for feeds without their own
    #[serde(default = "default_deviation")]
    pub default_deviation: f64,

    /// Monitored feeds; the built-in catalogue is used when empty
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

/// A monitored feed entry
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    /// Deviation threshold (%), defaults to `monitor.default_deviation`
    #[serde(default)]
    pub deviation: Option<f64>,
}

fn default_polling_interval_secs() -> u64 {
    60
}
fn default_deviation() -> f64 {
    DEFAULT_DEVIATION
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            polling_interval_secs: default_polling_interval_secs(),
            default_deviation: default_deviation(),
            feeds: Vec::new(),
        }
    }
}

impl MonitorConfig {
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_secs)
    }

    /// Build the feed registry
    pub fn registry(&self) -> Result<FeedRegistry, RegistryError> {
        if self.feeds.is_empty() {
            return FeedRegistry::builtin_with_default(self.default_deviation);
        }

        let feeds = self
            .feeds
            .iter()
            .map(|f| Feed::new(&f.name, f.deviation.unwrap_or(self.default_deviation)))
            .collect();
        FeedRegistry::new(feeds, self.default_deviation)
    }
}

/// Backoff configuration for dropped monitor connections
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    #[serde(default = "default_min_wait_secs")]
    pub min_wait_secs: u64,

    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,

    /// Unset retries forever
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

fn default_multiplier() -> f64 {
    1.0
}
fn default_min_wait_secs() -> u64 {
    4
}
fn default_max_wait_secs() -> u64 {
    30
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            multiplier: default_multiplier(),
            min_wait_secs: default_min_wait_secs(),
            max_wait_secs: default_max_wait_secs(),
            max_attempts: None,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            multiplier: self.multiplier,
            min_wait: Duration::from_secs(self.min_wait_secs),
            max_wait: Duration::from_secs(self.max_wait_secs),
            max_attempts: self.max_attempts,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Prometheus exporter port; no exporter when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// The embedded example configuration
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Replace the validator base URI when `base_uri` is set
    pub fn with_base_uri_override(mut self, base_uri: Option<String>) -> Self {
        if let Some(base_uri) = base_uri.filter(|b| !b.trim().is_empty()) {
            self.validator.base_uri = Some(base_uri);
        }
        self
    }
}
