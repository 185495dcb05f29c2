//! Snapshot types for the observability surface.

use crate::registry::{PriorityClass, Service, ServiceStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only view of one service's runtime state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub name: String,
    /// Human status string ("healthy", "unhealthy", "unknown", "error")
    pub status: ServiceStatus,
    pub performance_score: f64,
    pub success_count: u64,
    pub error_count: u64,
    pub last_health_check: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub priority_class: PriorityClass,
    pub capability_tags: Vec<String>,
}

impl From<&Service> for ServiceSummary {
    fn from(service: &Service) -> Self {
        Self {
            name: service.name.clone(),
            status: service.status,
            performance_score: service.performance_score,
            success_count: service.success_count,
            error_count: service.error_count,
            last_health_check: service.last_health_check,
            last_error: service.last_error.clone(),
            priority_class: service.priority_class,
            capability_tags: service.capability_tags.clone(),
        }
    }
}

/// Point-in-time snapshot of every registered service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterSnapshot {
    pub generated_at: DateTime<Utc>,
    pub services: Vec<ServiceSummary>,
}
