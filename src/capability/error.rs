//! Error types for capability calls.

use thiserror::Error;

/// Errors that can occur while executing work against a backend service.
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// Attempt exceeded its deadline.
    #[error("execution timeout after {0}ms")]
    Timeout(u64),

    /// The service returned an error response.
    #[error("upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The attempt could not be completed (connection refused, protocol
    /// failure, and similar).
    #[error("execution failed: {0}")]
    Failed(String),
}

/// Errors that can occur while probing a service for liveness.
///
/// These never escape the health monitor; they degrade the service to
/// error status and surface only through the metrics snapshot.
#[derive(Error, Debug, Clone)]
pub enum ProbeError {
    /// Probe exceeded its deadline.
    #[error("probe timeout after {0}ms")]
    Timeout(u64),

    /// The service could not be reached at all.
    #[error("service unreachable: {0}")]
    Unreachable(String),

    /// The probe ran but the service answered with an error.
    #[error("probe failed: {0}")]
    Failed(String),
}
