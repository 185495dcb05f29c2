//! Integration tests driving the assembled switchboard end to end.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use switchboard::capability::{
    BackendExecutor, ExecutorError, HealthProbe, Payload, ProbeError, ProbeReport,
};
use switchboard::config::{ServiceConfig, SwitchboardConfig};
use switchboard::optimizer::ActionKind;
use switchboard::registry::{PriorityClass, ServiceStatus};
use switchboard::routing::{RoutingError, RoutingRule};
use switchboard::SwitchboardBuilder;

/// Executor whose per-service behavior can be changed mid-test.
#[derive(Clone, Default)]
struct TestExecutor {
    ok: Arc<Mutex<HashMap<String, Payload>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl TestExecutor {
    fn succeed(&self, name: &str, value: Payload) {
        self.ok.lock().unwrap().insert(name.to_string(), value);
    }

    fn fail(&self, name: &str) {
        self.ok.lock().unwrap().remove(name);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendExecutor for TestExecutor {
    async fn execute(&self, service: &str, _payload: &Payload) -> Result<Payload, ExecutorError> {
        self.calls.lock().unwrap().push(service.to_string());
        match self.ok.lock().unwrap().get(service) {
            Some(value) => Ok(value.clone()),
            None => Err(ExecutorError::Upstream {
                status: 503,
                message: "unavailable".to_string(),
            }),
        }
    }
}

/// Probe whose per-service answers can be changed mid-test.
#[derive(Clone, Default)]
struct TestProbe {
    healthy: Arc<Mutex<HashMap<String, bool>>>,
}

impl TestProbe {
    fn set(&self, name: &str, healthy: bool) {
        self.healthy
            .lock()
            .unwrap()
            .insert(name.to_string(), healthy);
    }

    fn unreachable(&self, name: &str) {
        self.healthy.lock().unwrap().remove(name);
    }
}

#[async_trait]
impl HealthProbe for TestProbe {
    async fn probe(&self, service: &str) -> Result<ProbeReport, ProbeError> {
        match self.healthy.lock().unwrap().get(service) {
            Some(&healthy) => Ok(ProbeReport {
                healthy,
                latency_ms: 10,
            }),
            None => Err(ProbeError::Unreachable("connection refused".to_string())),
        }
    }
}

fn test_config() -> SwitchboardConfig {
    let mut config = SwitchboardConfig::default();
    config.routing.attempt_timeout_ms = 1000;
    for name in ["vault", "kms"] {
        config.services.push(ServiceConfig {
            name: name.to_string(),
            capability_tags: vec!["secrets".to_string()],
            priority_class: PriorityClass::Medium,
        });
    }
    config.routing.rules.push(RoutingRule::new(
        "secrets".to_string(),
        vec!["vault".to_string()],
        vec!["kms".to_string()],
    ));
    config
}

#[tokio::test]
async fn routes_through_primary_after_health_pass() {
    let executor = TestExecutor::default();
    let probe = TestProbe::default();
    executor.succeed("vault", json!({"secret": "s3cr3t"}));
    probe.set("vault", true);
    probe.set("kms", true);

    let switchboard = SwitchboardBuilder::new(
        test_config(),
        Arc::new(executor.clone()),
        Arc::new(probe.clone()),
    )
    .unwrap()
    .build();

    switchboard.run_health_checks().await;
    let outcome = switchboard.route("secrets", json!({})).await.unwrap();

    assert_eq!(outcome.service, "vault");
    assert_eq!(outcome.value, json!({"secret": "s3cr3t"}));
    assert_eq!(executor.calls(), vec!["vault"]);
}

#[tokio::test]
async fn route_fails_closed_before_any_probe() {
    let executor = TestExecutor::default();
    executor.succeed("vault", json!("ok"));

    let switchboard = SwitchboardBuilder::new(
        test_config(),
        Arc::new(executor.clone()),
        Arc::new(TestProbe::default()),
    )
    .unwrap()
    .build();

    // No health check has run: every candidate is Unknown and skipped.
    let err = switchboard.route("secrets", json!({})).await.unwrap_err();
    match err {
        RoutingError::AllServicesExhausted { attempts, .. } => {
            assert_eq!(attempts.len(), 2);
        }
        other => panic!("expected AllServicesExhausted, got {:?}", other),
    }
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn unhealthy_primary_routes_to_fallback() {
    let executor = TestExecutor::default();
    let probe = TestProbe::default();
    executor.succeed("vault", json!("primary"));
    executor.succeed("kms", json!("fallback"));
    probe.unreachable("vault");
    probe.set("kms", true);

    let switchboard = SwitchboardBuilder::new(
        test_config(),
        Arc::new(executor.clone()),
        Arc::new(probe.clone()),
    )
    .unwrap()
    .build();

    switchboard.run_health_checks().await;
    assert!(!switchboard.is_usable("vault"));

    let outcome = switchboard.route("secrets", json!({})).await.unwrap();
    assert_eq!(outcome.service, "kms");
    assert_eq!(executor.calls(), vec!["kms"]);

    let snapshot = switchboard.summarize();
    let vault = snapshot
        .services
        .iter()
        .find(|s| s.name == "vault")
        .unwrap();
    assert_eq!(vault.status, ServiceStatus::Error);
    assert_eq!(
        vault.last_error.as_deref(),
        Some("service unreachable: connection refused")
    );
}

#[tokio::test]
async fn recovery_is_picked_up_by_next_probe_cycle() {
    let executor = TestExecutor::default();
    let probe = TestProbe::default();
    executor.succeed("vault", json!("primary"));
    executor.succeed("kms", json!("fallback"));
    probe.set("vault", false);
    probe.set("kms", true);

    let switchboard = SwitchboardBuilder::new(
        test_config(),
        Arc::new(executor.clone()),
        Arc::new(probe.clone()),
    )
    .unwrap()
    .build();

    switchboard.run_health_checks().await;
    let outcome = switchboard.route("secrets", json!({})).await.unwrap();
    assert_eq!(outcome.service, "kms");

    // vault comes back; the next cycle reopens it for routing.
    probe.set("vault", true);
    switchboard.run_health_checks().await;
    let outcome = switchboard.route("secrets", json!({})).await.unwrap();
    assert_eq!(outcome.service, "vault");
}

#[tokio::test]
async fn executor_failures_feed_the_optimizer() {
    let executor = TestExecutor::default();
    let probe = TestProbe::default();
    executor.succeed("kms", json!("fallback"));
    executor.fail("vault");
    probe.set("vault", true);
    probe.set("kms", true);

    let switchboard = SwitchboardBuilder::new(
        test_config(),
        Arc::new(executor.clone()),
        Arc::new(probe.clone()),
    )
    .unwrap()
    .build();

    switchboard.run_health_checks().await;
    for _ in 0..5 {
        let outcome = switchboard.route("secrets", json!({})).await.unwrap();
        assert_eq!(outcome.service, "kms");
    }

    let snapshot = switchboard.summarize();
    let vault = snapshot
        .services
        .iter()
        .find(|s| s.name == "vault")
        .unwrap();
    assert_eq!(vault.error_count, 5);
    assert_eq!(vault.success_count, 0);

    let actions = switchboard.optimize();
    assert!(actions
        .iter()
        .any(|a| a.service == "vault" && a.action == ActionKind::IncreaseResilience));
    assert_eq!(actions, switchboard.pending_corrective_actions());

    // kms took all the work and stays unflagged.
    assert!(!actions.iter().any(|a| a.service == "kms"));
}

#[tokio::test]
async fn concurrent_routes_share_registry_without_losing_updates() {
    let executor = TestExecutor::default();
    let probe = TestProbe::default();
    executor.succeed("vault", json!("ok"));
    probe.set("vault", true);
    probe.set("kms", true);

    let switchboard = Arc::new(
        SwitchboardBuilder::new(
            test_config(),
            Arc::new(executor.clone()),
            Arc::new(probe.clone()),
        )
        .unwrap()
        .build(),
    );

    switchboard.run_health_checks().await;

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let switchboard = Arc::clone(&switchboard);
            tokio::spawn(async move { switchboard.route("secrets", json!({})).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let vault = switchboard.registry().get("vault").unwrap();
    assert_eq!(vault.success_count, 50);
}
