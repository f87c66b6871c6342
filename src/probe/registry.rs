// src/probe/registry.rs
use super::HealthProbe;
use crate::host::ModuleIdentity;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProbeId(u64);

impl fmt::Display for ProbeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "probe-{}", self.0)
    }
}

/// Back-reference to the module that contributed a probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeOwner {
    pub module_id: u64,
    pub symbolic_name: String,
}

impl From<&ModuleIdentity> for ProbeOwner {
    fn from(module: &ModuleIdentity) -> Self {
        Self {
            module_id: module.id,
            symbolic_name: module.symbolic_name.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ProbeRegistration {
    pub id: ProbeId,
    pub owner: ProbeOwner,
    pub probe: Arc<dyn HealthProbe>,
}

/// Live set of contributed probes.
///
/// Membership is driven by the host's plugin system; checks only take
/// snapshots of it.
#[derive(Clone, Default)]
pub struct ProbeRegistry {
    probes: Arc<DashMap<ProbeId, ProbeRegistration>>,
    next_id: Arc<AtomicU64>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, owner: impl Into<ProbeOwner>, probe: Arc<dyn HealthProbe>) -> ProbeId {
        let id = ProbeId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let owner = owner.into();
        tracing::info!(
            "Registered health probe {} for bundle [{}]",
            id,
            owner.symbolic_name
        );
        self.probes.insert(id, ProbeRegistration { id, owner, probe });
        id
    }

    pub fn deregister(&self, id: ProbeId) -> bool {
        match self.probes.remove(&id) {
            Some((_, registration)) => {
                tracing::info!(
                    "Deregistered health probe {} for bundle [{}]",
                    id,
                    registration.owner.symbolic_name
                );
                true
            }
            None => false,
        }
    }

    /// Drops every probe owned by a module, e.g. when it is uninstalled.
    pub fn deregister_module(&self, module_id: u64) -> usize {
        let before = self.probes.len();
        self.probes.retain(|_, r| r.owner.module_id != module_id);
        let removed = before.saturating_sub(self.probes.len());
        if removed > 0 {
            tracing::info!("Deregistered {} health probe(s) of module {}", removed, module_id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Current registrations in registration order.
    pub fn snapshot(&self) -> Vec<ProbeRegistration> {
        let mut registrations: Vec<ProbeRegistration> = self
            .probes
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        registrations.sort_by_key(|r| r.id);
        registrations
    }
}
