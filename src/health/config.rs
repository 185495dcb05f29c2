//! Configuration for health checking.

use serde::{Deserialize, Serialize};

/// Configuration for service health checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Whether the background health loop is enabled
    pub enabled: bool,
    /// Seconds between health check cycles
    pub interval_seconds: u64,
    /// Timeout for each individual probe call
    pub timeout_ms: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 30,
            timeout_ms: 5000,
        }
    }
}
