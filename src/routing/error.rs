//! Error types for routing failures

use thiserror::Error;

/// Which list a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateTier {
    Primary,
    Fallback,
}

impl std::fmt::Display for CandidateTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateTier::Primary => write!(f, "primary"),
            CandidateTier::Fallback => write!(f, "fallback"),
        }
    }
}

/// Why a candidate did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum Disposition {
    /// Health gate refused the candidate; no executor call was made and no
    /// counter changed. Carries the status that caused the skip.
    Skipped(String),
    /// Executor ran and failed
    Failed(String),
    /// Executor exceeded the attempt deadline
    TimedOut,
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disposition::Skipped(status) => write!(f, "skipped ({})", status),
            Disposition::Failed(detail) => write!(f, "failed: {}", detail),
            Disposition::TimedOut => write!(f, "timed out"),
        }
    }
}

/// One candidate's fate during a `route()` call, in trial order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Attempt {
    pub service: String,
    pub tier: CandidateTier,
    pub disposition: Disposition,
}

impl std::fmt::Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.service, self.tier, self.disposition)
    }
}

/// Errors that can occur during a routing call
#[derive(Debug, Error)]
pub enum RoutingError {
    /// No rule is mapped for the requested category
    #[error("unknown category '{category}'")]
    UnknownCategory { category: String },

    /// A candidate named in the routing table is not registered. A
    /// configuration bug must be visible, not swallowed.
    #[error("category '{category}' routes to unregistered service '{service}'")]
    UnknownService { category: String, service: String },

    /// Every candidate was skipped or failed
    #[error("all services exhausted for category '{category}': {}", format_attempts(.attempts))]
    AllServicesExhausted {
        category: String,
        attempts: Vec<Attempt>,
    },
}

fn format_attempts(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(|attempt| attempt.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
