// src/host/static_host.rs
use super::{LifecycleState, ModuleHost, ModuleIdentity};
use crate::error::HostError;
use crate::graph::DependencyGraphSnapshot;
use arc_swap::ArcSwap;
use serde::Deserialize;
use std::sync::Arc;

/// Full state of a [`StaticModuleHost`], loadable from YAML or JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSnapshot {
    #[serde(default)]
    pub modules: Vec<ModuleIdentity>,
    #[serde(default)]
    pub graph: DependencyGraphSnapshot,
    /// Set when the wiring metadata should be reported as unreadable.
    #[serde(default)]
    pub graph_error: Option<String>,
}

/// In-memory module host whose state can be swapped atomically while checks
/// are running.
pub struct StaticModuleHost {
    state: ArcSwap<HostSnapshot>,
}

impl StaticModuleHost {
    pub fn new(snapshot: HostSnapshot) -> Self {
        Self {
            state: ArcSwap::from_pointee(snapshot),
        }
    }

    pub fn snapshot(&self) -> Arc<HostSnapshot> {
        self.state.load_full()
    }

    pub fn replace(&self, snapshot: HostSnapshot) {
        self.state.store(Arc::new(snapshot));
        tracing::debug!("Module host state replaced");
    }

    pub fn install(&self, module: ModuleIdentity) {
        self.state.rcu(|current| {
            let mut next = HostSnapshot::clone(current);
            next.modules.retain(|m| m.id != module.id);
            next.modules.push(module.clone());
            next
        });
    }

    pub fn uninstall(&self, id: u64) -> bool {
        let previous = self.state.rcu(|current| {
            let mut next = HostSnapshot::clone(current);
            next.modules.retain(|m| m.id != id);
            next
        });
        previous.modules.iter().any(|m| m.id == id)
    }

    /// Moves a module to `state`, returning false when no module has `id`.
    pub fn set_state(&self, id: u64, state: LifecycleState) -> bool {
        let previous = self.state.rcu(|current| {
            let mut next = HostSnapshot::clone(current);
            if let Some(module) = next.modules.iter_mut().find(|m| m.id == id) {
                module.state = state;
            }
            next
        });
        previous.modules.iter().any(|m| m.id == id)
    }
}

impl ModuleHost for StaticModuleHost {
    fn modules(&self) -> Vec<ModuleIdentity> {
        self.state.load().modules.clone()
    }

    fn dependency_graph(&self) -> Result<DependencyGraphSnapshot, HostError> {
        let state = self.state.load();
        match &state.graph_error {
            Some(reason) => Err(HostError::GraphUnavailable(reason.clone())),
            None => Ok(state.graph.clone()),
        }
    }
}
