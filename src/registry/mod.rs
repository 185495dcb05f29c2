//! Service Registry module.
//!
//! Provides thread-safe in-memory storage and querying of backend services.

mod error;
mod service;
#[cfg(test)]
mod tests;

pub use error::*;
pub use service::*;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// The Service Registry owns all mutable per-service runtime state.
///
/// Every counter and score mutation goes through [`Registry::update_after_attempt`]
/// and every status change through [`Registry::set_status`]; both take the
/// entry's exclusive lock, so concurrent callers never lose an update.
/// Snapshot reads clone the entry and are eventually consistent.
///
/// # Examples
///
/// ```
/// use switchboard::registry::{PriorityClass, Registry, Service};
///
/// let registry = Registry::new();
/// let service = Service::new(
///     "secrets-vault".to_string(),
///     vec!["secrets".to_string()],
///     PriorityClass::High,
/// );
///
/// registry.register(service).unwrap();
/// assert_eq!(registry.service_count(), 1);
/// ```
pub struct Registry {
    services: DashMap<String, Service>,
}

impl Registry {
    /// Create a new empty Registry.
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    /// Register a new service.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateService` if a service with the same
    /// name already exists. Duplicate registration is a configuration bug
    /// and should abort startup.
    pub fn register(&self, service: Service) -> Result<(), RegistryError> {
        let name = service.name.clone();

        if self.services.contains_key(&name) {
            return Err(RegistryError::DuplicateService(name));
        }

        self.services.insert(name, service);
        Ok(())
    }

    /// Get a snapshot of a service by name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownService` if no service with the given
    /// name is registered.
    pub fn get(&self, name: &str) -> Result<Service, RegistryError> {
        self.services
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RegistryError::UnknownService(name.to_string()))
    }

    /// Whether a service with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Get snapshots of all registered services.
    pub fn all_services(&self) -> Vec<Service> {
        self.services
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Get the number of registered services.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Record a completed routing attempt against a service.
    ///
    /// Atomically increments the success or error counter, stores the
    /// observed latency, and recomputes the performance score. This is the
    /// single mutation entry point for counters and score; the entry lock
    /// makes the whole update linearizable per service.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownService` if the name is not registered.
    pub fn update_after_attempt(
        &self,
        name: &str,
        success: bool,
        latency_ms: u64,
    ) -> Result<(), RegistryError> {
        let mut service = self
            .services
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownService(name.to_string()))?;

        if success {
            service.success_count += 1;
        } else {
            service.error_count += 1;
        }
        service.last_latency_ms = latency_ms;
        service.recompute_score();

        Ok(())
    }

    /// Update the health status of a service.
    ///
    /// Sets the status, the probe timestamp, and sets/clears the last error
    /// detail. This is the only path that changes status; it is called
    /// solely by the health monitor.
    pub fn set_status(
        &self,
        name: &str,
        status: ServiceStatus,
        probed_at: DateTime<Utc>,
        error: Option<String>,
    ) -> Result<(), RegistryError> {
        let mut service = self
            .services
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownService(name.to_string()))?;

        service.status = status;
        service.last_health_check = Some(probed_at);
        service.last_error = error;

        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
