use super::*;
use std::sync::Arc;

fn test_service(name: &str) -> Service {
    Service::new(
        name.to_string(),
        vec!["deployment".to_string()],
        PriorityClass::Medium,
    )
}

#[test]
fn test_service_status_serialization() {
    // ServiceStatus::Healthy serializes to "healthy"
    let status = ServiceStatus::Healthy;
    let json = serde_json::to_string(&status).unwrap();
    assert_eq!(json, r#""healthy""#);

    // Deserialize back
    let deserialized: ServiceStatus = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, status);
}

#[test]
fn test_priority_class_serialization() {
    let class = PriorityClass::High;
    let json = serde_json::to_string(&class).unwrap();
    assert_eq!(json, r#""high""#);

    let deserialized: PriorityClass = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, class);
}

#[test]
fn test_service_creation_defaults() {
    let service = test_service("svc-a");

    assert_eq!(service.name, "svc-a");
    assert_eq!(service.status, ServiceStatus::Unknown);
    assert!(service.last_health_check.is_none());
    assert!(service.last_error.is_none());
    assert_eq!(service.success_count, 0);
    assert_eq!(service.error_count, 0);
    assert_eq!(service.performance_score, 1.0);
}

#[test]
fn test_register_and_get() {
    let registry = Registry::new();
    registry.register(test_service("svc-a")).unwrap();

    let service = registry.get("svc-a").unwrap();
    assert_eq!(service.name, "svc-a");
    assert_eq!(registry.service_count(), 1);
    assert!(registry.contains("svc-a"));
}

#[test]
fn test_register_duplicate_fails() {
    let registry = Registry::new();
    registry.register(test_service("svc-a")).unwrap();

    let result = registry.register(test_service("svc-a"));
    assert!(matches!(
        result.unwrap_err(),
        RegistryError::DuplicateService(name) if name == "svc-a"
    ));
    assert_eq!(registry.service_count(), 1);
}

#[test]
fn test_get_unknown_fails() {
    let registry = Registry::new();
    let result = registry.get("nope");
    assert!(matches!(
        result.unwrap_err(),
        RegistryError::UnknownService(name) if name == "nope"
    ));
}

#[test]
fn test_update_after_attempt_success() {
    let registry = Registry::new();
    registry.register(test_service("svc-a")).unwrap();

    registry.update_after_attempt("svc-a", true, 200).unwrap();

    let service = registry.get("svc-a").unwrap();
    assert_eq!(service.success_count, 1);
    assert_eq!(service.error_count, 0);
    assert_eq!(service.last_latency_ms, 200);
    // success_rate 1.0, latency_credit 0.8 -> 0.7 + 0.24
    assert!((service.performance_score - 0.94).abs() < 1e-9);
}

#[test]
fn test_update_after_attempt_failure() {
    let registry = Registry::new();
    registry.register(test_service("svc-a")).unwrap();

    registry.update_after_attempt("svc-a", false, 500).unwrap();

    let service = registry.get("svc-a").unwrap();
    assert_eq!(service.success_count, 0);
    assert_eq!(service.error_count, 1);
    // success_rate 0.0, latency_credit 0.5 -> 0.15
    assert!((service.performance_score - 0.15).abs() < 1e-9);
}

#[test]
fn test_update_after_attempt_unknown_service() {
    let registry = Registry::new();
    let result = registry.update_after_attempt("ghost", true, 10);
    assert!(matches!(
        result.unwrap_err(),
        RegistryError::UnknownService(_)
    ));
}

#[test]
fn test_score_latency_credit_floors_at_zero() {
    let registry = Registry::new();
    registry.register(test_service("svc-a")).unwrap();

    // Latency far beyond the 1000ms credit window contributes nothing,
    // and must never push the score negative.
    registry.update_after_attempt("svc-a", false, 30_000).unwrap();

    let service = registry.get("svc-a").unwrap();
    assert_eq!(service.performance_score, 0.0);
}

#[test]
fn test_score_mixed_history() {
    let registry = Registry::new();
    registry.register(test_service("svc-a")).unwrap();

    for _ in 0..70 {
        registry.update_after_attempt("svc-a", true, 100).unwrap();
    }
    for _ in 0..30 {
        registry.update_after_attempt("svc-a", false, 100).unwrap();
    }

    let service = registry.get("svc-a").unwrap();
    assert_eq!(service.success_count, 70);
    assert_eq!(service.error_count, 30);
    // success_rate 0.7, latency_credit 0.9 -> 0.49 + 0.27
    assert!((service.performance_score - 0.76).abs() < 1e-9);
}

#[test]
fn test_set_status() {
    let registry = Registry::new();
    registry.register(test_service("svc-a")).unwrap();

    let probed_at = chrono::Utc::now();
    registry
        .set_status("svc-a", ServiceStatus::Error, probed_at, Some("probe timeout".to_string()))
        .unwrap();

    let service = registry.get("svc-a").unwrap();
    assert_eq!(service.status, ServiceStatus::Error);
    assert_eq!(service.last_health_check, Some(probed_at));
    assert_eq!(service.last_error.as_deref(), Some("probe timeout"));
}

#[test]
fn test_set_status_clears_previous_error() {
    let registry = Registry::new();
    registry.register(test_service("svc-a")).unwrap();

    registry
        .set_status(
            "svc-a",
            ServiceStatus::Error,
            chrono::Utc::now(),
            Some("unreachable".to_string()),
        )
        .unwrap();
    registry
        .set_status("svc-a", ServiceStatus::Healthy, chrono::Utc::now(), None)
        .unwrap();

    let service = registry.get("svc-a").unwrap();
    assert_eq!(service.status, ServiceStatus::Healthy);
    assert!(service.last_error.is_none());
}

#[test]
fn test_concurrent_updates_lose_nothing() {
    // N threads each record one success; the counter must equal N.
    let registry = Arc::new(Registry::new());
    registry.register(test_service("svc-a")).unwrap();

    let threads = 16;
    let per_thread = 250;
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..per_thread {
                    registry.update_after_attempt("svc-a", true, 50).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let service = registry.get("svc-a").unwrap();
    assert_eq!(service.success_count, threads * per_thread);
    assert_eq!(service.error_count, 0);
}

mod score_bounds {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // The recomputed score stays in [0, 1] for any sequence of
        // successes, failures, and latencies.
        #[test]
        fn score_always_in_unit_interval(
            attempts in prop::collection::vec((any::<bool>(), 0u64..120_000), 1..200)
        ) {
            let registry = Registry::new();
            registry.register(test_service("svc-a")).unwrap();

            for (success, latency_ms) in attempts {
                registry.update_after_attempt("svc-a", success, latency_ms).unwrap();
                let service = registry.get("svc-a").unwrap();
                prop_assert!(service.performance_score >= 0.0);
                prop_assert!(service.performance_score <= 1.0);
            }
        }
    }
}
