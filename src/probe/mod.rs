// src/probe/mod.rs
mod aggregator;
mod registry;

pub use aggregator::{ProbeAggregator, ProbeVerdict};
pub use registry::{ProbeId, ProbeOwner, ProbeRegistration, ProbeRegistry};

use crate::health::{HealthResponse, ProbeType};
use async_trait::async_trait;

/// Health check contributed by a module, with its own readiness and liveness
/// verdicts independent of the module's lifecycle state.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn is_ready(&self) -> anyhow::Result<HealthResponse>;

    async fn is_live(&self) -> anyhow::Result<HealthResponse>;
}

pub(crate) async fn invoke(
    probe: &dyn HealthProbe,
    probe_type: ProbeType,
) -> anyhow::Result<HealthResponse> {
    match probe_type {
        ProbeType::Readiness => probe.is_ready().await,
        ProbeType::Liveness => probe.is_live().await,
    }
}
