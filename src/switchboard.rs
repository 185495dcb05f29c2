//! Top-level wiring of the router and its collaborators.

use crate::capability::{BackendExecutor, HealthProbe, Payload};
use crate::config::{ConfigError, SwitchboardConfig};
use crate::health::{HealthMonitor, ProbeVerdict};
use crate::metrics::{MetricsCollector, RouterSnapshot};
use crate::optimizer::{CorrectiveAction, Optimizer};
use crate::registry::{Registry, Service};
use crate::routing::{RouteOutcome, Router, RoutingError, RoutingRule, RoutingTable};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Startup-time assembly of a [`Switchboard`].
///
/// Services and rules can come from the configuration file, programmatic
/// registration, or both. Building consumes the builder; after that the
/// routing table cannot change, which is how startup-only registration is
/// enforced.
pub struct SwitchboardBuilder {
    config: SwitchboardConfig,
    executor: Arc<dyn BackendExecutor>,
    probe: Arc<dyn HealthProbe>,
    registry: Arc<Registry>,
    table: RoutingTable,
}

impl std::fmt::Debug for SwitchboardBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchboardBuilder")
            .field("config", &self.config)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl SwitchboardBuilder {
    /// Start a builder from configuration and the two capabilities.
    ///
    /// Services and rules declared in the configuration are registered
    /// immediately, so configuration bugs fail here rather than at call
    /// time.
    pub fn new(
        config: SwitchboardConfig,
        executor: Arc<dyn BackendExecutor>,
        probe: Arc<dyn HealthProbe>,
    ) -> Result<Self, ConfigError> {
        let registry = Arc::new(Registry::new());
        let mut table = RoutingTable::new();

        for service_config in config.services.clone() {
            registry
                .register(service_config.into())
                .map_err(|e| ConfigError::Validation {
                    field: "services".to_string(),
                    message: e.to_string(),
                })?;
        }
        for rule in config.routing.rules.clone() {
            table.insert(rule)?;
        }

        Ok(Self {
            config,
            executor,
            probe,
            registry,
            table,
        })
    }

    /// Register an additional service.
    pub fn register_service(&mut self, service: Service) -> Result<&mut Self, ConfigError> {
        self.registry
            .register(service)
            .map_err(|e| ConfigError::Validation {
                field: "services".to_string(),
                message: e.to_string(),
            })?;
        Ok(self)
    }

    /// Register an additional routing rule.
    pub fn register_rule(&mut self, rule: RoutingRule) -> Result<&mut Self, ConfigError> {
        self.table.insert(rule)?;
        Ok(self)
    }

    /// Assemble the switchboard. The routing table is frozen from here on.
    pub fn build(self) -> Switchboard {
        let monitor = Arc::new(HealthMonitor::new(
            Arc::clone(&self.registry),
            self.probe,
            self.config.health_check.clone(),
        ));

        let router = Router::new(
            Arc::clone(&self.registry),
            self.table,
            Arc::clone(&monitor),
            self.executor,
            Duration::from_millis(self.config.routing.attempt_timeout_ms),
        );

        let collector = MetricsCollector::new(Arc::clone(&self.registry));
        let optimizer = Optimizer::new(Arc::clone(&self.registry), self.config.optimizer);

        Switchboard {
            registry: self.registry,
            monitor,
            router,
            collector,
            optimizer,
            health_enabled: self.config.health_check.enabled,
        }
    }
}

/// The assembled adaptive service router.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use switchboard::capability::{BackendExecutor, HealthProbe};
/// # use switchboard::config::SwitchboardConfig;
/// # use switchboard::SwitchboardBuilder;
/// # async fn demo(
/// #     executor: Arc<dyn BackendExecutor>,
/// #     probe: Arc<dyn HealthProbe>,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// let config = SwitchboardConfig::load(Some("switchboard.toml".as_ref()))?;
/// let switchboard = SwitchboardBuilder::new(config, executor, probe)?.build();
///
/// switchboard.run_health_checks().await;
/// let outcome = switchboard
///     .route("secrets", serde_json::json!({"key": "db-password"}))
///     .await?;
/// println!("{} answered in {}ms", outcome.service, outcome.elapsed_ms);
/// # Ok(())
/// # }
/// ```
pub struct Switchboard {
    registry: Arc<Registry>,
    monitor: Arc<HealthMonitor>,
    router: Router,
    collector: MetricsCollector,
    optimizer: Optimizer,
    health_enabled: bool,
}

impl Switchboard {
    /// Route a payload for a category. See [`Router::route`].
    pub async fn route(&self, category: &str, payload: Payload) -> Result<RouteOutcome, RoutingError> {
        self.router.route(category, payload).await
    }

    /// Read-only snapshot of every service's runtime state.
    pub fn summarize(&self) -> RouterSnapshot {
        self.collector.summarize()
    }

    /// Probe every registered service once, concurrently.
    pub async fn run_health_checks(&self) -> Vec<(String, ProbeVerdict)> {
        self.monitor.check_all().await
    }

    /// Run one optimizer pass and return the corrective actions it emitted.
    pub fn optimize(&self) -> Vec<CorrectiveAction> {
        self.optimizer.scan()
    }

    /// Corrective actions from the most recent optimizer pass.
    pub fn pending_corrective_actions(&self) -> Vec<CorrectiveAction> {
        self.optimizer.pending_actions()
    }

    /// Whether a service may receive routed work right now.
    pub fn is_usable(&self, name: &str) -> bool {
        self.monitor.is_usable(name)
    }

    /// Shared handle to the registry, for embedding systems that surface
    /// registry state elsewhere.
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Spawn the background health loop, if enabled in configuration.
    /// Returns the task handle, which resolves once the token is cancelled.
    pub fn spawn_health_loop(&self, cancel_token: CancellationToken) -> Option<JoinHandle<()>> {
        if !self.health_enabled {
            return None;
        }
        Some(Arc::clone(&self.monitor).start(cancel_token))
    }
}
