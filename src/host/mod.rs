// src/host/mod.rs
//
// Read-only view over the module host: live module list and component wiring.
mod static_host;

pub use static_host::{HostSnapshot, StaticModuleHost};

use crate::error::HostError;
use crate::graph::DependencyGraphSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LifecycleState {
    Installed,
    Resolved,
    Starting,
    Active,
    Stopping,
    Uninstalled,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Installed => "INSTALLED",
            LifecycleState::Resolved => "RESOLVED",
            LifecycleState::Starting => "STARTING",
            LifecycleState::Active => "ACTIVE",
            LifecycleState::Stopping => "STOPPING",
            LifecycleState::Uninstalled => "UNINSTALLED",
        };
        f.write_str(name)
    }
}

/// A module as seen at check time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleIdentity {
    pub symbolic_name: String,
    pub id: u64,
    pub state: LifecycleState,
    /// Host declared by the module's `Fragment-Host` header, if any.
    #[serde(default)]
    pub fragment_host: Option<String>,
}

impl ModuleIdentity {
    pub fn new(symbolic_name: impl Into<String>, id: u64, state: LifecycleState) -> Self {
        Self {
            symbolic_name: symbolic_name.into(),
            id,
            state,
            fragment_host: None,
        }
    }

    pub fn fragment_of(mut self, host: impl Into<String>) -> Self {
        self.fragment_host = Some(host.into());
        self
    }

    pub fn is_fragment(&self) -> bool {
        self.fragment_host.is_some()
    }
}

/// The module host the engine observes.
///
/// Implementations hand out fresh snapshots on every call; nothing returned
/// here is cached by the engine.
pub trait ModuleHost: Send + Sync {
    fn modules(&self) -> Vec<ModuleIdentity>;

    /// Current wiring, restricted to components that failed to register and
    /// dependencies that are required but unavailable.
    fn dependency_graph(&self) -> Result<DependencyGraphSnapshot, HostError>;
}
