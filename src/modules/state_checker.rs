// src/modules/state_checker.rs
use crate::health::HealthResponse;
use crate::host::{LifecycleState, ModuleHost, ModuleIdentity};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub const UNDESIRED_STATE_MESSAGE: &str = "Found some required bundles in an undesired state.";
pub const NO_ISSUES_MESSAGE: &str = "No issues with bundles";

/// Symbolic names a probe type requires. Blank names are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredModuleSet {
    names: BTreeSet<String>,
}

impl RequiredModuleSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for RequiredModuleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Modules sitting in a lifecycle state they should have left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateScan {
    pub resolved: Vec<String>,
    pub installed: Vec<String>,
}

impl StateScan {
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty() && self.installed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resolved.len() + self.installed.len()
    }

    /// RESOLVED issues first, then INSTALLED ones.
    pub fn into_issues(self) -> Vec<String> {
        let mut issues = self.resolved;
        issues.extend(self.installed);
        issues
    }
}

/// Outcome of matching the required set against the live registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredCheck {
    /// Some required names have no live module; nothing else was inspected.
    Missing(HealthResponse),
    Present {
        found: Vec<ModuleIdentity>,
        states: StateScan,
    },
}

impl RequiredCheck {
    pub fn into_response(self) -> HealthResponse {
        match self {
            RequiredCheck::Missing(response) => response,
            RequiredCheck::Present { states, .. } if states.is_empty() => {
                HealthResponse::up(NO_ISSUES_MESSAGE)
            }
            RequiredCheck::Present { states, .. } => {
                HealthResponse::down(UNDESIRED_STATE_MESSAGE, states.into_issues())
            }
        }
    }
}

#[derive(Clone)]
pub struct ModuleStateChecker {
    host: Arc<dyn ModuleHost>,
}

impl ModuleStateChecker {
    pub fn new(host: Arc<dyn ModuleHost>) -> Self {
        Self { host }
    }

    /// Checks that every required module is deployed, then that no module in
    /// the registry is stuck RESOLVED or INSTALLED.
    pub fn check_required(&self, required: &RequiredModuleSet) -> RequiredCheck {
        let modules = self.host.modules();

        let found: Vec<ModuleIdentity> = modules
            .iter()
            .filter(|m| required.contains(&m.symbolic_name))
            .cloned()
            .collect();
        let found_names: BTreeSet<&str> = found.iter().map(|m| m.symbolic_name.as_str()).collect();

        if found_names.len() != required.len() {
            let message = format!(
                "Found {} out of {} bundles required by the configuration",
                found_names.len(),
                required.len()
            );
            warn!("{}", message);
            let issues = required
                .iter()
                .filter(|name| !found_names.contains(name))
                .map(|name| format!("Bundle [{}] was not found.", name))
                .collect();
            return RequiredCheck::Missing(HealthResponse::down(message, issues));
        }

        debug!("All {} required bundles found", required.len());
        RequiredCheck::Present {
            found,
            states: scan(&modules),
        }
    }

    /// Scans the whole live registry, regardless of any required set.
    pub fn scan_states(&self) -> StateScan {
        scan(&self.host.modules())
    }
}

fn scan(modules: &[ModuleIdentity]) -> StateScan {
    let resolved = watch_list(
        modules,
        |m| m.state == LifecycleState::Resolved && !m.is_fragment(),
        LifecycleState::Resolved,
    );
    let installed = watch_list(
        modules,
        |m| m.state == LifecycleState::Installed,
        LifecycleState::Installed,
    );
    StateScan { resolved, installed }
}

fn watch_list(
    modules: &[ModuleIdentity],
    matches: impl Fn(&ModuleIdentity) -> bool,
    state: LifecycleState,
) -> Vec<String> {
    let stuck: Vec<&ModuleIdentity> = modules.iter().filter(|&m| matches(m)).collect();
    if !stuck.is_empty() {
        warn!("Please note that the following bundles are in the {} state:", state);
    }
    stuck
        .into_iter()
        .map(|m| {
            warn!(" * [{}] {}", m.id, m.symbolic_name);
            format!("[{}] {} is {}", m.id, m.symbolic_name, state)
        })
        .collect()
}
