//! Health monitoring for registered services.
//!
//! This module drives the external health probe capability for each service,
//! applies the result to the registry, and answers the single question the
//! router asks: is this service currently usable?

mod config;
mod state;


pub use config::*;
pub use state::*;

use crate::capability::{HealthProbe, ProbeError};
use crate::registry::{Registry, ServiceStatus};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Monitors service health via the external probe capability.
///
/// The monitor is the only component that writes status and probe
/// timestamps, always through [`Registry::set_status`]. Probe errors never
/// propagate out of the monitor; they degrade the service to
/// [`ServiceStatus::Error`] and are visible through the metrics snapshot.
pub struct HealthMonitor {
    /// Reference to the service registry
    registry: Arc<Registry>,
    /// External probe capability
    probe: Arc<dyn HealthProbe>,
    /// Health check configuration
    config: HealthCheckConfig,
    /// Per-service probe tracking state
    state: DashMap<String, ProbeState>,
}

impl HealthMonitor {
    /// Create a new health monitor.
    pub fn new(
        registry: Arc<Registry>,
        probe: Arc<dyn HealthProbe>,
        config: HealthCheckConfig,
    ) -> Self {
        Self {
            registry,
            probe,
            config,
            state: DashMap::new(),
        }
    }

    /// Whether the named service may receive routed work right now.
    ///
    /// True only for `Healthy`. A service that has never been probed is
    /// `Unknown` and therefore not usable (fail-closed); unregistered names
    /// are likewise not usable.
    pub fn is_usable(&self, name: &str) -> bool {
        self.registry
            .get(name)
            .map(|service| service.status == ServiceStatus::Healthy)
            .unwrap_or(false)
    }

    /// Probe a single service and apply the result to the registry.
    ///
    /// The probe call is bounded by the configured timeout; a timeout is
    /// recorded as a probe failure. Returns the verdict for callers that
    /// want to report it.
    pub async fn check_service(&self, name: &str) -> ProbeVerdict {
        let start = Instant::now();
        let deadline = Duration::from_millis(self.config.timeout_ms);

        let verdict = match tokio::time::timeout(deadline, self.probe.probe(name)).await {
            Ok(Ok(report)) => {
                let latency_ms = report.latency_ms;
                metrics::histogram!("switchboard_probe_latency_seconds",
                    "service" => name.to_string()
                )
                .record(latency_ms as f64 / 1000.0);

                if report.healthy {
                    ProbeVerdict::Up { latency_ms }
                } else {
                    ProbeVerdict::Down { latency_ms }
                }
            }
            Ok(Err(error)) => ProbeVerdict::Failed { error },
            Err(_) => ProbeVerdict::Failed {
                error: ProbeError::Timeout(self.config.timeout_ms),
            },
        };

        tracing::debug!(
            service_name = %name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            verdict = ?verdict,
            "Probe completed"
        );

        self.apply_verdict(name, &verdict);
        verdict
    }

    /// Apply a probe verdict to the registry and the per-service state.
    fn apply_verdict(&self, name: &str, verdict: &ProbeVerdict) {
        let mut state = self.state.entry(name.to_string()).or_default();
        let now = chrono::Utc::now();
        state.last_check_time = Some(now);

        let (status, error) = match verdict {
            ProbeVerdict::Up { latency_ms } => {
                state.consecutive_failures = 0;
                state.last_probe_latency_ms = Some(*latency_ms);
                (ServiceStatus::Healthy, None)
            }
            ProbeVerdict::Down { latency_ms } => {
                state.consecutive_failures = 0;
                state.last_probe_latency_ms = Some(*latency_ms);
                (ServiceStatus::Unhealthy, Some("service reported itself down".to_string()))
            }
            ProbeVerdict::Failed { error } => {
                state.consecutive_failures += 1;
                (ServiceStatus::Error, Some(error.to_string()))
            }
        };

        if self.registry.set_status(name, status, now, error).is_ok() && state.last_status != status
        {
            tracing::info!(
                service_name = %name,
                old_status = ?state.last_status,
                new_status = ?status,
                "Service status changed"
            );
            state.last_status = status;
        }
    }

    /// Probe state for a service, if it has ever been checked.
    pub fn probe_state(&self, name: &str) -> Option<ProbeState> {
        self.state.get(name).map(|entry| entry.value().clone())
    }

    /// Probe all registered services once, concurrently.
    ///
    /// Probes are independent with no ordering guarantee between them.
    pub async fn check_all(&self) -> Vec<(String, ProbeVerdict)> {
        let names: Vec<String> = self
            .registry
            .all_services()
            .into_iter()
            .map(|service| service.name)
            .collect();

        let checks = names.iter().map(|name| self.check_service(name));
        let verdicts = futures::future::join_all(checks).await;

        names.into_iter().zip(verdicts).collect()
    }

    /// Start the health monitor background task.
    /// Returns a JoinHandle that resolves when the monitor stops.
    pub fn start(self: Arc<Self>, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(self.config.interval_seconds));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                interval_seconds = self.config.interval_seconds,
                "Health monitor started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Health monitor shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let verdicts = self.check_all().await;
                        tracing::debug!(
                            services_checked = verdicts.len(),
                            "Health check cycle completed"
                        );
                    }
                }
            }
        })
    }
}
