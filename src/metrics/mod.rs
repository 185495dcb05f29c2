//! # Metrics Collection Module
//!
//! Read-only observability over the registry, plus fleet gauges through the
//! `metrics` facade.
//!
//! ## Metrics Recorded
//!
//! **Counters** (recorded by the router):
//! - `switchboard_attempts_total{service, outcome}` - Completed attempts
//! - `switchboard_skips_total{service}` - Candidates skipped by the health gate
//! - `switchboard_exhausted_total{category}` - Routes that exhausted every candidate
//!
//! **Histograms:**
//! - `switchboard_attempt_duration_seconds{service}` - Winning attempt duration
//! - `switchboard_probe_latency_seconds{service}` - Health probe latency
//!
//! **Gauges** (refreshed by [`MetricsCollector::update_fleet_gauges`]):
//! - `switchboard_services_total` - Registered services
//! - `switchboard_services_healthy` - Services currently healthy
//!
//! The crate only records through the facade; installing a recorder or
//! exporter belongs to the embedding system.

pub mod types;

pub use types::*;

use crate::registry::{Registry, ServiceStatus};
use std::sync::Arc;

/// Derived-state consumer over the registry.
///
/// Holds no counters of its own; every number in a snapshot is read from
/// registry state at call time.
pub struct MetricsCollector {
    /// Reference to the service registry
    registry: Arc<Registry>,
}

impl MetricsCollector {
    /// Create a new MetricsCollector.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Produce a read-only snapshot of every service, sorted by name for
    /// stable output.
    pub fn summarize(&self) -> RouterSnapshot {
        let mut services: Vec<ServiceSummary> = self
            .registry
            .all_services()
            .iter()
            .map(ServiceSummary::from)
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));

        self.update_fleet_gauges();

        RouterSnapshot {
            generated_at: chrono::Utc::now(),
            services,
        }
    }

    /// Refresh fleet gauges from registry state.
    pub fn update_fleet_gauges(&self) {
        let services = self.registry.all_services();

        metrics::gauge!("switchboard_services_total").set(services.len() as f64);

        let healthy_count = services
            .iter()
            .filter(|service| service.status == ServiceStatus::Healthy)
            .count();
        metrics::gauge!("switchboard_services_healthy").set(healthy_count as f64);
    }
}
