// src/graph/analyzer.rs
use super::snapshot::{
    CircularDependency, ComponentDeclaration, DependencyGraphSnapshot, DependencyKind,
};
use crate::host::ModuleHost;
use std::sync::Arc;
use tracing::warn;

/// Classifies structural defects in the host's component wiring.
#[derive(Clone)]
pub struct DependencyGraphAnalyzer {
    host: Arc<dyn ModuleHost>,
}

impl DependencyGraphAnalyzer {
    pub fn new(host: Arc<dyn ModuleHost>) -> Self {
        Self { host }
    }

    /// Pulls a fresh graph holding only unregistered components and
    /// required-but-unavailable dependencies.
    ///
    /// When the host cannot produce one, the snapshot comes back empty so the
    /// rest of the check still runs.
    pub fn analyze(&self) -> DependencyGraphSnapshot {
        match self.host.dependency_graph() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Skipping dependency graph analysis: {}", e);
                DependencyGraphSnapshot::default()
            }
        }
    }

    /// Analyzes the current graph and flattens its findings into issue lines.
    pub fn issues(&self) -> Vec<String> {
        graph_issues(&self.analyze())
    }
}

/// Issue lines for a snapshot: unregistered components, cycle members, the
/// four standard missing categories, then custom ones.
pub fn graph_issues(graph: &DependencyGraphSnapshot) -> Vec<String> {
    let mut issues = Vec::new();

    if !graph.unregistered.is_empty() {
        warn!("{} unregistered components found", graph.unregistered.len());
        issues.extend(unregistered_issues(&graph.unregistered));
    }

    if !graph.circular.is_empty() {
        warn!("Circular dependencies:");
        issues.extend(circular_issues(&graph.circular));
    }

    for kind in DependencyKind::STANDARD
        .into_iter()
        .chain(std::iter::once(DependencyKind::Custom))
    {
        let missing: Vec<_> = graph.missing_of(kind).collect();
        if missing.is_empty() {
            continue;
        }
        warn!("The following {} are missing:", kind);
        for dependency in missing {
            warn!(" * {}", dependency.issue());
            issues.push(dependency.issue());
        }
    }

    issues
}

fn unregistered_issues(components: &[ComponentDeclaration]) -> Vec<String> {
    components
        .iter()
        .map(|c| {
            let issue = match &c.owning_module {
                Some(module) => format!("Unregistered component {} in bundle: {}", c.name, module),
                None => format!("Unregistered component {}", c.name),
            };
            warn!(" * {}", issue);
            issue
        })
        .collect()
}

// Cycle boundaries are not encoded: the list is flat.
fn circular_issues(cycles: &[CircularDependency]) -> Vec<String> {
    let mut issues = Vec::new();
    for cycle in cycles {
        warn!(" *");
        for component in &cycle.components {
            warn!(" -> {}", component);
            issues.push(component.clone());
        }
    }
    issues
}
