// src/probe/aggregator.rs
use super::registry::{ProbeOwner, ProbeRegistry};
use super::invoke;
use crate::error::ProbeFailure;
use crate::health::{HealthResponse, ProbeType};
use crate::host::ModuleIdentity;
use crate::metrics::HealthMetrics;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// One probe's answer, attributed to the module that contributed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeVerdict {
    pub owner: ProbeOwner,
    pub response: HealthResponse,
}

impl ProbeVerdict {
    /// Issue lines this verdict adds to a check. A DOWN verdict always yields
    /// at least one, naming the module when the probe gave none.
    pub fn into_issues(self) -> Vec<String> {
        if self.response.is_up() {
            return Vec::new();
        }
        if !self.response.issues().is_empty() {
            return self.response.into_issues();
        }
        let line = if self.response.message().is_empty() {
            format!("Bundle [{}] declares being DOWN", self.owner.symbolic_name)
        } else {
            format!(
                "Bundle [{}] declares being DOWN: {}",
                self.owner.symbolic_name,
                self.response.message()
            )
        };
        vec![line]
    }
}

/// Runs the registered probes of the modules relevant to a check.
#[derive(Clone)]
pub struct ProbeAggregator {
    registry: ProbeRegistry,
    metrics: Option<Arc<HealthMetrics>>,
}

impl ProbeAggregator {
    pub fn new(registry: ProbeRegistry, metrics: Option<Arc<HealthMetrics>>) -> Self {
        Self { registry, metrics }
    }

    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    /// Issues reported by DOWN probes whose owner is in `scope`, in
    /// registration order. UP probes contribute nothing.
    pub async fn run_probes(
        &self,
        probe_type: ProbeType,
        scope: &[ModuleIdentity],
        limit: Duration,
    ) -> Vec<String> {
        self.verdicts(probe_type, scope, limit)
            .await
            .into_iter()
            .flat_map(ProbeVerdict::into_issues)
            .collect()
    }

    /// Invokes every in-scope probe concurrently. A probe that errors, panics
    /// or exceeds `limit` is reported DOWN without affecting the others.
    pub async fn verdicts(
        &self,
        probe_type: ProbeType,
        scope: &[ModuleIdentity],
        limit: Duration,
    ) -> Vec<ProbeVerdict> {
        let scope_ids: HashSet<u64> = scope.iter().map(|m| m.id).collect();
        let registrations: Vec<_> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|r| scope_ids.contains(&r.owner.module_id))
            .collect();

        if registrations.is_empty() {
            debug!("No {} probes registered for the required bundles", probe_type);
            return Vec::new();
        }

        // The deadline sits on the join handle, so a probe that blocks its
        // worker thread still times out.
        let tasks: Vec<_> = registrations
            .iter()
            .map(|registration| {
                let probe = registration.probe.clone();
                let mut handle =
                    tokio::spawn(async move { invoke(probe.as_ref(), probe_type).await });
                async move {
                    let joined = timeout(limit, &mut handle).await;
                    if joined.is_err() {
                        handle.abort();
                    }
                    joined
                }
            })
            .collect();

        // join_all keeps the order of `registrations`
        let results = futures::future::join_all(tasks).await;

        registrations
            .into_iter()
            .zip(results)
            .map(|(registration, result)| {
                let owner = registration.owner;
                let response = match result {
                    Ok(Ok(Ok(response))) => response,
                    Ok(Ok(Err(e))) => self.failed(&owner, ProbeFailure::Errored(e)),
                    Ok(Err(e)) if e.is_panic() => self.failed(&owner, ProbeFailure::Panicked),
                    Ok(Err(e)) => self.failed(&owner, ProbeFailure::Errored(anyhow::anyhow!(e))),
                    Err(_) => self.failed(&owner, ProbeFailure::TimedOut(limit)),
                };

                if response.is_up() {
                    info!("Bundle [{}] declares being UP", owner.symbolic_name);
                } else {
                    warn!(
                        "Bundle [{}] declares being DOWN with following issues:",
                        owner.symbolic_name
                    );
                    for issue in response.issues() {
                        warn!("{}", issue);
                    }
                }

                ProbeVerdict { owner, response }
            })
            .collect()
    }

    fn failed(&self, owner: &ProbeOwner, failure: ProbeFailure) -> HealthResponse {
        error!(
            module = %owner.symbolic_name,
            module_id = owner.module_id,
            "health probe {}",
            failure
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_probe_failure(&owner.symbolic_name);
        }
        HealthResponse::down(
            "Health probe did not respond",
            vec![failure.issue(&owner.symbolic_name)],
        )
    }
}
