//! Corrective-action scanning over registry state.
//!
//! The optimizer owns no clock; the embedding system triggers [`Optimizer::scan`]
//! on whatever cycle it likes. A scan reads registry state, flags services
//! whose score or error ratio breaches the configured thresholds, and
//! replaces the pending action list. Executing the actions is an external
//! collaborator's responsibility.

use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Thresholds for flagging underperforming services.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Services scoring below this are flagged for latency work
    pub score_floor: f64,
    /// Services whose errors exceed this fraction of successes are flagged
    /// for resilience work
    pub error_ratio: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            score_floor: 0.7,
            error_ratio: 0.1,
        }
    }
}

/// Remediation recommended for one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Errors dominate; wrap the service in a stronger retry policy
    IncreaseResilience,
    /// Score breached; the service needs latency work such as caching
    ImproveLatency,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::IncreaseResilience => write!(f, "increase-resilience"),
            ActionKind::ImproveLatency => write!(f, "improve-latency"),
        }
    }
}

/// A corrective signal emitted by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectiveAction {
    pub service: String,
    pub action: ActionKind,
}

/// Scans the registry for services breaching the configured thresholds.
pub struct Optimizer {
    /// Reference to the service registry
    registry: Arc<Registry>,
    /// Flagging thresholds
    config: OptimizerConfig,
    /// Actions from the most recent scan
    pending: RwLock<Vec<CorrectiveAction>>,
}

impl Optimizer {
    /// Create a new optimizer.
    pub fn new(registry: Arc<Registry>, config: OptimizerConfig) -> Self {
        Self {
            registry,
            config,
            pending: RwLock::new(Vec::new()),
        }
    }

    /// Scan every service once and replace the pending action list.
    ///
    /// A service with a breaching error ratio gets `increase-resilience`; a
    /// service with a breaching score gets `improve-latency`. The conditions
    /// are independent, so one service can receive both tags in a single
    /// scan. Emits no other side effects.
    pub fn scan(&self) -> Vec<CorrectiveAction> {
        let mut actions = Vec::new();

        for service in self.registry.all_services() {
            // Never flag a service with no completed attempts; there is
            // nothing observed to correct yet.
            if service.success_count + service.error_count == 0 {
                continue;
            }

            let errors_dominant =
                service.error_count as f64 > self.config.error_ratio * service.success_count as f64;
            let score_breached = service.performance_score < self.config.score_floor;

            if errors_dominant {
                tracing::info!(
                    service_name = %service.name,
                    error_count = service.error_count,
                    success_count = service.success_count,
                    "Flagging service for resilience work"
                );
                actions.push(CorrectiveAction {
                    service: service.name.clone(),
                    action: ActionKind::IncreaseResilience,
                });
            }
            if score_breached {
                tracing::info!(
                    service_name = %service.name,
                    performance_score = service.performance_score,
                    "Flagging service for latency work"
                );
                actions.push(CorrectiveAction {
                    service: service.name.clone(),
                    action: ActionKind::ImproveLatency,
                });
            }
        }

        *self.pending.write().expect("optimizer pending lock poisoned") = actions.clone();
        actions
    }

    /// Actions from the most recent scan, for the external remediation
    /// collaborator.
    pub fn pending_actions(&self) -> Vec<CorrectiveAction> {
        self.pending
            .read()
            .expect("optimizer pending lock poisoned")
            .clone()
    }
}
