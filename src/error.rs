// src/error.rs
use std::time::Duration;

/// Raised by a [`crate::host::ModuleHost`] when its wiring metadata cannot be read.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    #[error("Dependency graph unavailable: {0}")]
    GraphUnavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("probeTimeoutMs must be greater than zero")]
    ZeroProbeTimeout,

    #[error("{field} must start with '/', got {value:?}")]
    RelativePath { field: &'static str, value: String },

    #[error("metrics path {0:?} collides with a health route")]
    MetricsPathCollision(String),
}

/// Why a single probe could not produce a verdict.
#[derive(Debug, thiserror::Error)]
pub enum ProbeFailure {
    #[error("failed: {0}")]
    Errored(anyhow::Error),

    #[error("timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    #[error("panicked")]
    Panicked,
}

impl ProbeFailure {
    /// Issue line surfaced in the aggregated response.
    pub fn issue(&self, module: &str) -> String {
        match self {
            ProbeFailure::Errored(e) => format!("Health probe of bundle [{}] failed: {}", module, e),
            other => format!("Health probe of bundle [{}] {}", module, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_failure_issue_lines() {
        let err = ProbeFailure::Errored(anyhow::anyhow!("connection refused"));
        assert_eq!(
            err.issue("com.acme.search"),
            "Health probe of bundle [com.acme.search] failed: connection refused"
        );

        let timeout = ProbeFailure::TimedOut(Duration::from_millis(250));
        assert_eq!(
            timeout.issue("com.acme.search"),
            "Health probe of bundle [com.acme.search] timed out after 250ms"
        );

        assert_eq!(
            ProbeFailure::Panicked.issue("com.acme.search"),
            "Health probe of bundle [com.acme.search] panicked"
        );
    }
}
