// src/config/models.rs
use crate::error::ConfigError;
use crate::health::ProbeType;
use crate::modules::RequiredModuleSet;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// What needs to be verified for the readiness probe and the liveness probe
/// respectively, plus the settings of the standalone server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_true")]
    pub verify_bundles_states_for_readiness: bool,
    #[serde(default)]
    pub bundle_symbolic_names_for_readiness: Vec<String>,
    #[serde(default)]
    pub verify_bundles_states_for_liveness: bool,
    #[serde(default)]
    pub bundle_symbolic_names_for_liveness: Vec<String>,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Module host description served by the standalone binary.
    #[serde(default)]
    pub host_snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

/// Per-probe-type view of the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub required: RequiredModuleSet,
    pub verify_states: bool,
}

fn default_true() -> bool {
    true
}

fn default_probe_timeout_ms() -> u64 {
    5_000
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_base_path() -> String {
    "/health".to_string()
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verify_bundles_states_for_readiness: true,
            bundle_symbolic_names_for_readiness: Vec::new(),
            verify_bundles_states_for_liveness: false,
            bundle_symbolic_names_for_liveness: Vec::new(),
            probe_timeout_ms: default_probe_timeout_ms(),
            server: ServerConfig::default(),
            metrics: MetricsConfig::default(),
            host_snapshot: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            base_path: default_base_path(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
        }
    }
}

impl Config {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn settings(&self, probe_type: ProbeType) -> ProbeSettings {
        match probe_type {
            ProbeType::Readiness => ProbeSettings {
                required: RequiredModuleSet::new(&self.bundle_symbolic_names_for_readiness),
                verify_states: self.verify_bundles_states_for_readiness,
            },
            ProbeType::Liveness => ProbeSettings {
                required: RequiredModuleSet::new(&self.bundle_symbolic_names_for_liveness),
                verify_states: self.verify_bundles_states_for_liveness,
            },
        }
    }

    /// Route serving the given probe type, e.g. `/health/readiness`.
    pub fn route(&self, probe_type: ProbeType) -> String {
        format!(
            "{}/{}",
            self.server.base_path.trim_end_matches('/'),
            probe_type.as_str()
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::ZeroProbeTimeout);
        }
        if !self.server.base_path.starts_with('/') {
            return Err(ConfigError::RelativePath {
                field: "server.basePath",
                value: self.server.base_path.clone(),
            });
        }
        if !self.metrics.path.starts_with('/') {
            return Err(ConfigError::RelativePath {
                field: "metrics.path",
                value: self.metrics.path.clone(),
            });
        }
        if self.metrics.enabled
            && [ProbeType::Readiness, ProbeType::Liveness]
                .iter()
                .any(|p| self.route(*p) == self.metrics.path)
        {
            return Err(ConfigError::MetricsPathCollision(self.metrics.path.clone()));
        }
        Ok(())
    }
}
