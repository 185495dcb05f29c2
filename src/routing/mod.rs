//! Category routing across registered services.
//!
//! This module implements the core routing algorithm: resolve the rule for
//! a category, walk its primary candidates in order, fall back to the
//! fallback chain, and report total exhaustion with the fate of every
//! candidate.

pub mod error;
pub mod table;

pub use error::{Attempt, CandidateTier, Disposition, RoutingError};
pub use table::{RoutingRule, RoutingTable};

use crate::capability::{BackendExecutor, Payload};
use crate::health::HealthMonitor;
use crate::registry::Registry;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Successful result of one routing call.
#[derive(Debug, Clone)]
pub struct RouteOutcome {
    /// The service that produced the result
    pub service: String,
    /// Elapsed time of the winning attempt
    pub elapsed_ms: u64,
    /// The service's response payload
    pub value: Payload,
}

/// Router walks the candidate chain for a category and returns the first
/// success.
///
/// Candidates within one `route()` call are tried strictly sequentially,
/// never in parallel, so a success has no duplicate side effects to undo.
/// Independent `route()` calls may run concurrently; all shared state lives
/// in the registry, which serializes per-service updates.
pub struct Router {
    /// Reference to the service registry
    registry: Arc<Registry>,

    /// Static category-to-candidates mapping, immutable after startup
    table: RoutingTable,

    /// Health gate consulted per candidate
    monitor: Arc<HealthMonitor>,

    /// External work capability
    executor: Arc<dyn BackendExecutor>,

    /// Deadline applied to each executor call
    attempt_timeout: Duration,
}

impl Router {
    /// Create a new router. The table moves in and cannot be mutated again.
    pub fn new(
        registry: Arc<Registry>,
        table: RoutingTable,
        monitor: Arc<HealthMonitor>,
        executor: Arc<dyn BackendExecutor>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            table,
            monitor,
            executor,
            attempt_timeout,
        }
    }

    /// The routing table in use.
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Route a payload to the first candidate that is healthy and succeeds.
    ///
    /// Primary candidates are always fully exhausted before any fallback is
    /// attempted. A candidate that is not usable is skipped without an
    /// executor call and without touching its counters. A candidate that
    /// fails or times out is recorded against its counters and the walk
    /// continues. First success wins and returns immediately.
    ///
    /// # Errors
    ///
    /// - `RoutingError::UnknownCategory` if no rule maps the category.
    /// - `RoutingError::UnknownService` if the table names a service the
    ///   registry does not know.
    /// - `RoutingError::AllServicesExhausted` when every candidate was
    ///   skipped or failed, naming each one's disposition.
    pub async fn route(&self, category: &str, payload: Payload) -> Result<RouteOutcome, RoutingError> {
        let rule = self.table.rules_for(category)?;
        let route_id = uuid::Uuid::new_v4();

        let candidates = rule
            .primary_order
            .iter()
            .map(|name| (name.as_str(), CandidateTier::Primary))
            .chain(
                rule.fallback_order
                    .iter()
                    .map(|name| (name.as_str(), CandidateTier::Fallback)),
            );

        let mut attempts = Vec::new();

        for (name, tier) in candidates {
            let service = self.registry.get(name).map_err(|_| {
                RoutingError::UnknownService {
                    category: category.to_string(),
                    service: name.to_string(),
                }
            })?;

            if !self.monitor.is_usable(name) {
                tracing::debug!(
                    route_id = %route_id,
                    category = %category,
                    service_name = %name,
                    status = %service.status,
                    "Skipping unusable candidate"
                );
                metrics::counter!("switchboard_skips_total",
                    "service" => name.to_string()
                )
                .increment(1);
                attempts.push(Attempt {
                    service: name.to_string(),
                    tier,
                    disposition: Disposition::Skipped(service.status.to_string()),
                });
                continue;
            }

            let started = Instant::now();
            match tokio::time::timeout(self.attempt_timeout, self.executor.execute(name, &payload))
                .await
            {
                Ok(Ok(value)) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    self.record_attempt(category, name, true, elapsed_ms)?;
                    metrics::histogram!("switchboard_attempt_duration_seconds",
                        "service" => name.to_string()
                    )
                    .record(elapsed_ms as f64 / 1000.0);

                    tracing::info!(
                        route_id = %route_id,
                        category = %category,
                        service_name = %name,
                        tier = %tier,
                        elapsed_ms,
                        "Routed"
                    );
                    return Ok(RouteOutcome {
                        service: name.to_string(),
                        elapsed_ms,
                        value,
                    });
                }
                Ok(Err(error)) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    self.record_attempt(category, name, false, elapsed_ms)?;

                    tracing::warn!(
                        route_id = %route_id,
                        category = %category,
                        service_name = %name,
                        error = %error,
                        "Attempt failed, falling back"
                    );
                    attempts.push(Attempt {
                        service: name.to_string(),
                        tier,
                        disposition: Disposition::Failed(error.to_string()),
                    });
                }
                Err(_) => {
                    // Timeout counts against the service exactly like an
                    // explicit failure.
                    let elapsed_ms = self.attempt_timeout.as_millis() as u64;
                    self.record_attempt(category, name, false, elapsed_ms)?;

                    tracing::warn!(
                        route_id = %route_id,
                        category = %category,
                        service_name = %name,
                        timeout_ms = elapsed_ms,
                        "Attempt timed out, falling back"
                    );
                    attempts.push(Attempt {
                        service: name.to_string(),
                        tier,
                        disposition: Disposition::TimedOut,
                    });
                }
            }
        }

        metrics::counter!("switchboard_exhausted_total",
            "category" => category.to_string()
        )
        .increment(1);
        tracing::error!(
            route_id = %route_id,
            category = %category,
            candidates = attempts.len(),
            "All services exhausted"
        );
        Err(RoutingError::AllServicesExhausted {
            category: category.to_string(),
            attempts,
        })
    }

    /// Record a completed attempt through the registry's single mutation
    /// entry point.
    fn record_attempt(
        &self,
        category: &str,
        name: &str,
        success: bool,
        elapsed_ms: u64,
    ) -> Result<(), RoutingError> {
        metrics::counter!("switchboard_attempts_total",
            "service" => name.to_string(),
            "outcome" => if success { "success" } else { "failure" }
        )
        .increment(1);

        self.registry
            .update_after_attempt(name, success, elapsed_ms)
            .map_err(|_| RoutingError::UnknownService {
                category: category.to_string(),
                service: name.to_string(),
            })
    }
}
