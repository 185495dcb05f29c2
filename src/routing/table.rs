//! Static category-to-service routing rules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::ConfigError;
use crate::routing::RoutingError;

/// Routing rule for one request category.
///
/// Primary candidates are tried first, in listed order; fallback candidates
/// only after every primary has been skipped or failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRule {
    /// Unique category key (e.g. "secrets", "deployment")
    pub category: String,
    /// Services tried first, in listed order
    pub primary_order: Vec<String>,
    /// Services tried only after all primaries are exhausted
    #[serde(default)]
    pub fallback_order: Vec<String>,
    /// Human-readable eligibility notes. Descriptive metadata only; the
    /// router does not evaluate these.
    #[serde(default)]
    pub eligibility_conditions: Vec<String>,
}

impl RoutingRule {
    /// Create a rule with no eligibility notes.
    pub fn new(category: String, primary_order: Vec<String>, fallback_order: Vec<String>) -> Self {
        Self {
            category,
            primary_order,
            fallback_order,
            eligibility_conditions: Vec::new(),
        }
    }
}

/// The Routing Table maps categories to ordered candidate lists.
///
/// Populated once at startup and read-only afterward. Immutability is
/// enforced by ownership: the builder inserts rules, then the table moves
/// into the router and no mutation path remains.
#[derive(Debug, Default)]
pub struct RoutingTable {
    rules: HashMap<String, RoutingRule>,
}

impl RoutingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule, validating it eagerly.
    ///
    /// # Errors
    ///
    /// - `ConfigError::EmptyRule` if both candidate lists are empty. A
    ///   category that can never route is a configuration bug and must
    ///   fail at startup, not at call time.
    /// - `ConfigError::DuplicateCategory` if the category is already mapped.
    pub fn insert(&mut self, rule: RoutingRule) -> Result<(), ConfigError> {
        if rule.primary_order.is_empty() && rule.fallback_order.is_empty() {
            return Err(ConfigError::EmptyRule(rule.category));
        }
        if self.rules.contains_key(&rule.category) {
            return Err(ConfigError::DuplicateCategory(rule.category));
        }
        self.rules.insert(rule.category.clone(), rule);
        Ok(())
    }

    /// Look up the rule for a category.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::UnknownCategory` if the category is not mapped.
    pub fn rules_for(&self, category: &str) -> Result<&RoutingRule, RoutingError> {
        self.rules.get(category).ok_or_else(|| RoutingError::UnknownCategory {
            category: category.to_string(),
        })
    }

    /// Number of mapped categories.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// All mapped categories, in no particular order.
    pub fn categories(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }
}
