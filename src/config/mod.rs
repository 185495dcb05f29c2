//! Configuration module for Switchboard
//!
//! Provides layered configuration loading from files, environment variables,
//! and defaults.
//!
//! # Configuration Precedence
//!
//! 1. Environment variables (`SWITCHBOARD_*`, highest priority)
//! 2. Configuration file (TOML)
//! 3. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use switchboard::config::SwitchboardConfig;
//!
//! // Load defaults
//! let config = SwitchboardConfig::default();
//! assert_eq!(config.routing.attempt_timeout_ms, 30_000);
//!
//! // Parse from TOML
//! let toml = r#"
//! [routing]
//! attempt_timeout_ms = 2000
//! "#;
//! let config: SwitchboardConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.routing.attempt_timeout_ms, 2000);
//! ```

pub mod error;
pub mod logging;
pub mod routing;
pub mod service;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use routing::RoutingConfig;
pub use service::ServiceConfig;

// Re-export component configs for convenience
pub use crate::health::HealthCheckConfig;
pub use crate::optimizer::OptimizerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the switchboard.
///
/// Aggregates all configuration sections: health checking, routing,
/// static services, optimizer thresholds, and logging.
///
/// # Example
///
/// ```rust
/// use switchboard::config::SwitchboardConfig;
///
/// let config = SwitchboardConfig::default();
/// assert!(config.health_check.enabled);
/// assert_eq!(config.optimizer.score_floor, 0.7);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SwitchboardConfig {
    /// Health check configuration
    pub health_check: HealthCheckConfig,
    /// Request routing configuration
    pub routing: RoutingConfig,
    /// Static service definitions
    pub services: Vec<ServiceConfig>,
    /// Optimizer thresholds
    pub optimizer: OptimizerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl SwitchboardConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports SWITCHBOARD_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(timeout) = std::env::var("SWITCHBOARD_ATTEMPT_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse() {
                self.routing.attempt_timeout_ms = t;
            }
        }
        if let Ok(interval) = std::env::var("SWITCHBOARD_HEALTH_INTERVAL_SECONDS") {
            if let Ok(i) = interval.parse() {
                self.health_check.interval_seconds = i;
            }
        }

        // Logging settings
        if let Ok(level) = std::env::var("SWITCHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SWITCHBOARD_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }
}
