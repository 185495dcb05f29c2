//! Per-service probe state tracking.

use crate::registry::ServiceStatus;
use chrono::{DateTime, Utc};

/// Tracks probe bookkeeping for a single service.
///
/// Lives beside the registry rather than in it: the registry holds the
/// authoritative status, this records how the monitor got there so status
/// transitions can be logged exactly once.
#[derive(Debug, Clone)]
pub struct ProbeState {
    /// Count of consecutive failed probes
    pub consecutive_failures: u32,
    /// When the last probe completed
    pub last_check_time: Option<DateTime<Utc>>,
    /// Last status written to the registry (for detecting transitions)
    pub last_status: ServiceStatus,
    /// Latency observed on the last successful probe
    pub last_probe_latency_ms: Option<u64>,
}

impl Default for ProbeState {
    fn default() -> Self {
        Self {
            consecutive_failures: 0,
            last_check_time: None,
            last_status: ServiceStatus::Unknown,
            last_probe_latency_ms: None,
        }
    }
}

/// Outcome of a single probe cycle for one service.
#[derive(Debug, Clone)]
pub enum ProbeVerdict {
    /// Probe completed and the service reported itself up
    Up { latency_ms: u64 },
    /// Probe completed and the service reported itself down
    Down { latency_ms: u64 },
    /// Probe errored or timed out
    Failed { error: crate::capability::ProbeError },
}

impl ProbeVerdict {
    /// The registry status this verdict maps to.
    pub fn status(&self) -> ServiceStatus {
        match self {
            ProbeVerdict::Up { .. } => ServiceStatus::Healthy,
            ProbeVerdict::Down { .. } => ServiceStatus::Unhealthy,
            ProbeVerdict::Failed { .. } => ServiceStatus::Error,
        }
    }
}
