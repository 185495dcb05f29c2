//! Capability interfaces supplied by the embedding system.
//!
//! The router never talks to a concrete backend directly. It drives two
//! abstract capabilities: a [`BackendExecutor`] that performs the actual unit
//! of work for a named service, and a [`HealthProbe`] that reports current
//! liveness and latency for a named service. Both are registered once at
//! startup and shared as trait objects.

use async_trait::async_trait;

mod error;

pub use error::{ExecutorError, ProbeError};

/// Opaque request/response payload carried through the router untouched.
pub type Payload = serde_json::Value;

/// Result of a single liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    /// Whether the service considers itself able to take work
    pub healthy: bool,
    /// Observed probe round-trip latency
    pub latency_ms: u64,
}

/// Performs the unit of work for a named service.
///
/// Implemented once per embedding system and registered by name-agnostic
/// dispatch: the router passes the service name through and never branches
/// on name identity itself.
///
/// # Object Safety
///
/// Designed to be used as `Arc<dyn BackendExecutor>`. All async methods use
/// `async_trait` for compatibility with trait objects.
///
/// # Timeouts
///
/// The router bounds every call with its configured attempt timeout.
/// Implementations may apply their own tighter deadlines; a timeout at
/// either layer is treated as a plain failure for routing purposes.
#[async_trait]
pub trait BackendExecutor: Send + Sync + 'static {
    /// Execute `payload` against the named service.
    ///
    /// # Returns
    ///
    /// - `Ok(Payload)` with the service's response on success
    /// - `Err(ExecutorError::Upstream)` if the service returned an error
    /// - `Err(ExecutorError::Failed)` if the attempt could not be completed
    async fn execute(&self, service: &str, payload: &Payload) -> Result<Payload, ExecutorError>;
}

/// Reports current liveness and latency for a named service.
///
/// The health monitor bounds every call with its configured probe timeout.
/// In-flight probe work is not preemptively cancelled by the router; any
/// cancellation policy belongs to the implementation.
#[async_trait]
pub trait HealthProbe: Send + Sync + 'static {
    /// Probe the named service once.
    async fn probe(&self, service: &str) -> Result<ProbeReport, ProbeError>;
}
