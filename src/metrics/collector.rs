// src/metrics/collector.rs
use crate::health::{HealthStatus, ProbeType};
use anyhow::Result;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<HealthMetrics>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(HealthMetrics::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<HealthMetrics> {
        self.collector.clone()
    }

    /// Text exposition of every registered metric.
    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct HealthMetrics {
    pub checks_total: IntCounterVec,
    pub check_duration_seconds: HistogramVec,
    pub probe_failures_total: IntCounterVec,
}

impl HealthMetrics {
    pub fn new(registry: &Registry) -> Result<Self> {
        let checks_total = IntCounterVec::new(
            Opts::new("health_checks_total", "Health checks performed, by verdict"),
            &["probe", "status"],
        )?;
        registry.register(Box::new(checks_total.clone()))?;

        let check_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "health_check_duration_seconds",
                "Health check duration in seconds",
            ),
            &["probe"],
        )?;
        registry.register(Box::new(check_duration_seconds.clone()))?;

        let probe_failures_total = IntCounterVec::new(
            Opts::new(
                "health_probe_failures_total",
                "Contributed probes that errored, panicked or timed out",
            ),
            &["module"],
        )?;
        registry.register(Box::new(probe_failures_total.clone()))?;

        Ok(Self {
            checks_total,
            check_duration_seconds,
            probe_failures_total,
        })
    }

    pub fn record_check(
        &self,
        probe: ProbeType,
        status: HealthStatus,
        duration: std::time::Duration,
    ) {
        let status = status.to_string();
        self.checks_total
            .with_label_values(&[probe.as_str(), &status])
            .inc();

        self.check_duration_seconds
            .with_label_values(&[probe.as_str()])
            .observe(duration.as_secs_f64());
    }

    pub fn record_probe_failure(&self, module: &str) {
        self.probe_failures_total.with_label_values(&[module]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_gather_exposes_recorded_checks() {
        let registry = MetricsRegistry::new().unwrap();
        let metrics = registry.collector();
        metrics.record_check(ProbeType::Readiness, HealthStatus::Down, Duration::from_millis(3));
        metrics.record_probe_failure("com.acme.search");

        let text = String::from_utf8(registry.gather().unwrap()).unwrap();
        assert!(text.contains(r#"health_checks_total{probe="readiness",status="DOWN"} 1"#));
        assert!(text.contains(r#"health_probe_failures_total{module="com.acme.search"} 1"#));
    }
}
