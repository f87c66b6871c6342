// src/health/components.rs
use super::HealthResponse;
use crate::graph::DependencyGraphAnalyzer;
use crate::modules::{ModuleStateChecker, NO_ISSUES_MESSAGE, UNDESIRED_STATE_MESSAGE};
use tracing::debug;

/// Structural verdict over the whole host: dependency graph defects plus any
/// module stuck RESOLVED or INSTALLED.
#[derive(Clone)]
pub struct ComponentHealthAggregator {
    analyzer: DependencyGraphAnalyzer,
    states: ModuleStateChecker,
}

impl ComponentHealthAggregator {
    pub fn new(analyzer: DependencyGraphAnalyzer, states: ModuleStateChecker) -> Self {
        Self { analyzer, states }
    }

    pub fn verify(&self) -> HealthResponse {
        let graph_issues = self.analyzer.issues();
        let states = self.states.scan_states();

        if graph_issues.is_empty() && states.is_empty() {
            debug!("No structural issues found");
            return HealthResponse::up(NO_ISSUES_MESSAGE);
        }

        // Only lifecycle findings: same wording as the required-bundle check.
        if graph_issues.is_empty() {
            return HealthResponse::down(UNDESIRED_STATE_MESSAGE, states.into_issues());
        }

        let mut issues = graph_issues;
        issues.extend(states.into_issues());

        let message = match issues.len() {
            1 => "Found 1 issue with bundles".to_string(),
            n => format!("Found {} issues with bundles", n),
        };
        HealthResponse::down(message, issues)
    }
}
