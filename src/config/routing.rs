//! Routing configuration

use serde::{Deserialize, Serialize};

use crate::routing::RoutingRule;

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Deadline applied to each executor attempt
    pub attempt_timeout_ms: u64,
    /// Declarative routing rules, validated when the table is built
    pub rules: Vec<RoutingRule>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_ms: 30_000,
            rules: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_config_defaults() {
        let config = RoutingConfig::default();
        assert_eq!(config.attempt_timeout_ms, 30_000);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_routing_config_toml() {
        let toml = r#"
            attempt_timeout_ms = 1500

            [[rules]]
            category = "secrets"
            primary_order = ["vault"]
            fallback_order = ["kms"]
        "#;
        let config: RoutingConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.attempt_timeout_ms, 1500);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].category, "secrets");
        assert!(config.rules[0].eligibility_conditions.is_empty());
    }
}
