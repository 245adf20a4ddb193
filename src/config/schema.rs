//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the rule
//! server. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, connection limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Hot reload settings.
    pub reload: ReloadConfig,

    /// Named rules, evaluated in order for every request.
    pub rules: Vec<RuleConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// A named rule and its condition block.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Rule identifier for logging, metrics and the `x-matched-rules` header.
    pub name: String,

    /// Condition block: `if <left> <op> <right>` and `if_op <and|or>` lines.
    #[serde(default)]
    pub conditions: String,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (trace, debug, info, warn, error or a full EnvFilter).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Config file hot reload.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Watch the config file and swap rules on change.
    pub enabled: bool,

    /// Poll interval for the file watcher in seconds.
    pub poll_interval_secs: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            poll_interval_secs: 2,
        }
    }
}
