// src/health/engine.rs
use super::components::ComponentHealthAggregator;
use super::{HealthResponse, ProbeType};
use crate::config::{Config, ProbeSettings};
use crate::graph::DependencyGraphAnalyzer;
use crate::host::ModuleHost;
use crate::metrics::HealthMetrics;
use crate::modules::{ModuleStateChecker, RequiredCheck, NO_ISSUES_MESSAGE, UNDESIRED_STATE_MESSAGE};
use crate::probe::{ProbeAggregator, ProbeRegistry};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Readiness and liveness entry point.
///
/// Holds no state between checks apart from the current configuration; each
/// call reads the live host and probe registry afresh.
pub struct HealthEngine {
    config: ArcSwap<Config>,
    state_checker: ModuleStateChecker,
    probes: ProbeAggregator,
    components: ComponentHealthAggregator,
    metrics: Option<Arc<HealthMetrics>>,
}

impl HealthEngine {
    pub fn new(
        config: Config,
        state_checker: ModuleStateChecker,
        probes: ProbeAggregator,
        components: ComponentHealthAggregator,
        metrics: Option<Arc<HealthMetrics>>,
    ) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            state_checker,
            probes,
            components,
            metrics,
        }
    }

    /// Wires every checker against a single host.
    pub fn for_host(
        config: Config,
        host: Arc<dyn ModuleHost>,
        registry: ProbeRegistry,
        metrics: Option<Arc<HealthMetrics>>,
    ) -> Self {
        let state_checker = ModuleStateChecker::new(host.clone());
        let probes = ProbeAggregator::new(registry, metrics.clone());
        let components = ComponentHealthAggregator::new(
            DependencyGraphAnalyzer::new(host),
            state_checker.clone(),
        );
        Self::new(config, state_checker, probes, components, metrics)
    }

    pub fn config(&self) -> Arc<Config> {
        self.config.load_full()
    }

    /// Swaps in new settings, probe timeout included. Checks already running
    /// keep the old ones.
    pub fn reconfigure(&self, config: Config) {
        self.config.store(Arc::new(config));
        info!("Health check configuration updated");
    }

    pub async fn readiness(&self) -> HealthResponse {
        self.check(ProbeType::Readiness).await
    }

    pub async fn liveness(&self) -> HealthResponse {
        self.check(ProbeType::Liveness).await
    }

    pub async fn check(&self, probe_type: ProbeType) -> HealthResponse {
        let start = Instant::now();
        let config = self.config.load_full();
        let settings = config.settings(probe_type);

        let response = self
            .decide(probe_type, settings, config.probe_timeout())
            .await;

        if let Some(metrics) = &self.metrics {
            metrics.record_check(probe_type, response.status(), start.elapsed());
        }
        debug!(
            "{} check finished: {} ({})",
            probe_type,
            response.status(),
            response.message()
        );
        response
    }

    // Short-circuits on the first DOWN signal: required bundles and their
    // probes, then the global structural check.
    async fn decide(
        &self,
        probe_type: ProbeType,
        settings: ProbeSettings,
        probe_timeout: Duration,
    ) -> HealthResponse {
        if !settings.required.is_empty() {
            match self.state_checker.check_required(&settings.required) {
                RequiredCheck::Missing(response) => return response,
                RequiredCheck::Present { found, states } => {
                    let mut issues = self
                        .probes
                        .run_probes(probe_type, &found, probe_timeout)
                        .await;
                    issues.extend(states.into_issues());
                    if !issues.is_empty() {
                        return HealthResponse::down(UNDESIRED_STATE_MESSAGE, issues);
                    }
                }
            }
        }

        if settings.verify_states {
            let response = self.components.verify();
            if !response.is_up() {
                return response;
            }
        }

        HealthResponse::up(NO_ISSUES_MESSAGE)
    }
}
