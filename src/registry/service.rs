use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Service health status.
///
/// Determines whether the service may receive routed work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Service passed its most recent probe and is accepting work
    Healthy,
    /// Service answered its most recent probe but reported itself down
    Unhealthy,
    /// Health has never been established (not yet probed)
    Unknown,
    /// The most recent probe itself failed or timed out
    Error,
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Healthy => write!(f, "healthy"),
            ServiceStatus::Unhealthy => write!(f, "unhealthy"),
            ServiceStatus::Unknown => write!(f, "unknown"),
            ServiceStatus::Error => write!(f, "error"),
        }
    }
}

/// Coarse priority hint for a service.
///
/// Used only as a tie-break hint by embedding systems; routing order is
/// governed entirely by the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClass {
    High,
    #[default]
    Medium,
    Low,
}

/// A named backend service and its mutable runtime state.
///
/// Created at startup and never destroyed during the process lifetime.
/// Counters and score are mutated exclusively through
/// [`Registry::update_after_attempt`](crate::registry::Registry::update_after_attempt);
/// status and probe timestamps only through
/// [`Registry::set_status`](crate::registry::Registry::set_status).
///
/// # Examples
///
/// ```
/// use switchboard::registry::{PriorityClass, Service, ServiceStatus};
///
/// let service = Service::new(
///     "secrets-vault".to_string(),
///     vec!["secrets".to_string()],
///     PriorityClass::High,
/// );
/// assert_eq!(service.status, ServiceStatus::Unknown);
/// assert_eq!(service.performance_score, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique stable identifier
    pub name: String,
    /// What the service can do (informational; not used for routing)
    pub capability_tags: Vec<String>,
    /// Tie-break hint, never a primary ordering
    pub priority_class: PriorityClass,
    /// Current health status
    pub status: ServiceStatus,
    /// When the service was last probed, if ever
    pub last_health_check: Option<DateTime<Utc>>,
    /// Most recent probe error detail, if any
    pub last_error: Option<String>,
    /// Completed attempts that succeeded
    pub success_count: u64,
    /// Completed attempts that failed or timed out
    pub error_count: u64,
    /// Latency of the most recent completed attempt
    pub last_latency_ms: u64,
    /// Derived rolling performance score in [0, 1]
    pub performance_score: f64,
}

impl Service {
    /// Create a new service with no recorded history.
    ///
    /// Status starts `Unknown` (fail-closed: not routable until the first
    /// successful probe). The score starts at 1.0 and is recomputed on the
    /// first completed attempt.
    pub fn new(name: String, capability_tags: Vec<String>, priority_class: PriorityClass) -> Self {
        Self {
            name,
            capability_tags,
            priority_class,
            status: ServiceStatus::Unknown,
            last_health_check: None,
            last_error: None,
            success_count: 0,
            error_count: 0,
            last_latency_ms: 0,
            performance_score: 1.0,
        }
    }

    /// Recompute the performance score from the current counters and the
    /// latest observed latency.
    ///
    /// `score = 0.7 * success_rate + 0.3 * latency_credit`, where the
    /// latency credit decays linearly from 1.0 at 0ms to 0.0 at 1000ms.
    /// The result is clamped to [0, 1].
    pub(crate) fn recompute_score(&mut self) {
        let completed = self.success_count + self.error_count;
        if completed == 0 {
            return;
        }
        let success_rate = self.success_count as f64 / completed as f64;
        let latency_credit = ((1000.0 - self.last_latency_ms as f64) / 1000.0).clamp(0.0, 1.0);
        self.performance_score = (0.7 * success_rate + 0.3 * latency_credit).clamp(0.0, 1.0);
    }
}
