// tests/health_engine_tests.rs
use async_trait::async_trait;
use module_health::config::Config;
use module_health::graph::{CircularDependency, DependencyGraphAnalyzer, DependencyGraphSnapshot};
use module_health::health::ComponentHealthAggregator;
use module_health::host::{HostSnapshot, LifecycleState, ModuleIdentity, StaticModuleHost};
use module_health::modules::ModuleStateChecker;
use module_health::{HealthEngine, HealthProbe, HealthResponse, HealthStatus, ProbeRegistry, ProbeType};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct FixedProbe {
    ready: HealthResponse,
}

#[async_trait]
impl HealthProbe for FixedProbe {
    async fn is_ready(&self) -> anyhow::Result<HealthResponse> {
        Ok(self.ready.clone())
    }

    async fn is_live(&self) -> anyhow::Result<HealthResponse> {
        Ok(HealthResponse::up("No issue detected."))
    }
}

fn readiness_config(required: &[&str]) -> Config {
    Config {
        bundle_symbolic_names_for_readiness: required.iter().map(|s| s.to_string()).collect(),
        verify_bundles_states_for_readiness: true,
        ..Config::default()
    }
}

fn setup(config: Config, snapshot: HostSnapshot) -> (HealthEngine, ProbeRegistry, Arc<StaticModuleHost>) {
    let host = Arc::new(StaticModuleHost::new(snapshot));
    let registry = ProbeRegistry::new();
    let engine = HealthEngine::for_host(config, host.clone(), registry.clone(), None);
    (engine, registry, host)
}

fn catalog() -> ModuleIdentity {
    ModuleIdentity::new("com.acme.catalog", 12, LifecycleState::Active)
}

#[tokio::test]
async fn scenario_required_bundle_active() {
    let (engine, _, _) = setup(
        readiness_config(&["com.acme.catalog"]),
        HostSnapshot {
            modules: vec![catalog()],
            ..HostSnapshot::default()
        },
    );

    let response = engine.check(ProbeType::Readiness).await;
    assert_eq!(
        response.to_json(),
        r#"{"status":"UP","message":"No issues with bundles","issues":[]}"#
    );
}

#[tokio::test]
async fn scenario_required_bundle_missing() {
    let (engine, _, _) = setup(
        readiness_config(&["com.acme.catalog", "com.acme.search"]),
        HostSnapshot {
            modules: vec![catalog()],
            ..HostSnapshot::default()
        },
    );

    let response = engine.check(ProbeType::Readiness).await;
    assert_eq!(response.status(), HealthStatus::Down);
    assert_eq!(
        response.message(),
        "Found 1 out of 2 bundles required by the configuration"
    );
    assert_eq!(
        response.issues(),
        &["Bundle [com.acme.search] was not found.".to_string()]
    );
}

#[tokio::test]
async fn scenario_installed_bundle_without_requirements() {
    let (engine, _, _) = setup(
        readiness_config(&[]),
        HostSnapshot {
            modules: vec![
                catalog(),
                ModuleIdentity::new("com.acme.cart", 31, LifecycleState::Installed),
            ],
            ..HostSnapshot::default()
        },
    );

    let response = engine.check(ProbeType::Readiness).await;
    assert_eq!(response.status(), HealthStatus::Down);
    assert_eq!(
        response.message(),
        "Found some required bundles in an undesired state."
    );
    assert_eq!(response.issues(), &["[31] com.acme.cart is INSTALLED".to_string()]);
}

#[tokio::test]
async fn scenario_circular_dependency() {
    let host = Arc::new(StaticModuleHost::new(HostSnapshot {
        modules: vec![catalog()],
        graph: DependencyGraphSnapshot {
            circular: vec![CircularDependency {
                components: vec!["A".into(), "B".into()],
            }],
            ..Default::default()
        },
        ..HostSnapshot::default()
    }));
    let components = ComponentHealthAggregator::new(
        DependencyGraphAnalyzer::new(host.clone()),
        ModuleStateChecker::new(host.clone()),
    );

    let response = components.verify();
    assert_eq!(response.status(), HealthStatus::Down);
    assert_eq!(response.message(), "Found 2 issues with bundles");
    assert_eq!(response.issues(), &["A".to_string(), "B".to_string()]);

    let (engine, _, _) = setup(readiness_config(&[]), host.snapshot().as_ref().clone());
    assert_eq!(engine.check(ProbeType::Readiness).await, response);
}

#[tokio::test]
async fn scenario_probe_reports_down() {
    let (engine, registry, _) = setup(
        readiness_config(&["com.acme.catalog"]),
        HostSnapshot {
            modules: vec![catalog()],
            ..HostSnapshot::default()
        },
    );
    registry.register(
        &catalog(),
        Arc::new(FixedProbe {
            ready: HealthResponse::down("storage", vec!["disk full".into()]),
        }),
    );

    let response = engine.check(ProbeType::Readiness).await;
    assert_eq!(response.status(), HealthStatus::Down);
    assert!(response.issues().contains(&"disk full".to_string()));

    // Liveness has no required bundles configured, so the probe is not consulted.
    assert!(engine.check(ProbeType::Liveness).await.is_up());
}

#[tokio::test]
async fn probe_issues_precede_lifecycle_issues() {
    let (engine, registry, _) = setup(
        readiness_config(&["com.acme.catalog"]),
        HostSnapshot {
            modules: vec![
                catalog(),
                ModuleIdentity::new("com.acme.search", 20, LifecycleState::Resolved),
            ],
            ..HostSnapshot::default()
        },
    );
    registry.register(
        &catalog(),
        Arc::new(FixedProbe {
            ready: HealthResponse::down("storage", vec!["disk full".into()]),
        }),
    );

    let response = engine.check(ProbeType::Readiness).await;
    assert_eq!(
        response.issues(),
        &[
            "disk full".to_string(),
            "[20] com.acme.search is RESOLVED".to_string()
        ]
    );
}

#[tokio::test]
async fn probes_of_unrequired_bundles_are_ignored() {
    let search = ModuleIdentity::new("com.acme.search", 20, LifecycleState::Active);
    let (engine, registry, _) = setup(
        readiness_config(&["com.acme.catalog"]),
        HostSnapshot {
            modules: vec![catalog(), search.clone()],
            ..HostSnapshot::default()
        },
    );
    registry.register(
        &search,
        Arc::new(FixedProbe {
            ready: HealthResponse::down("index", vec!["index corrupt".into()]),
        }),
    );

    assert!(engine.check(ProbeType::Readiness).await.is_up());
}

#[tokio::test]
async fn repeated_checks_are_identical() {
    let (engine, registry, _) = setup(
        readiness_config(&["com.acme.catalog"]),
        HostSnapshot {
            modules: vec![
                catalog(),
                ModuleIdentity::new("com.acme.cart", 31, LifecycleState::Installed),
                ModuleIdentity::new("com.acme.search", 20, LifecycleState::Resolved),
            ],
            ..HostSnapshot::default()
        },
    );
    for issue in ["disk full", "queue backlog", "cache cold"] {
        registry.register(
            &catalog(),
            Arc::new(FixedProbe {
                ready: HealthResponse::down("probe", vec![issue.to_string()]),
            }),
        );
    }

    let first = engine.check(ProbeType::Readiness).await.to_json();
    let second = engine.check(ProbeType::Readiness).await.to_json();
    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_checks_tolerate_registry_churn() {
    let (engine, registry, _) = setup(
        Config {
            bundle_symbolic_names_for_liveness: vec!["com.acme.catalog".into()],
            ..readiness_config(&["com.acme.catalog"])
        },
        HostSnapshot {
            modules: vec![catalog()],
            ..HostSnapshot::default()
        },
    );
    let engine = Arc::new(engine);

    let churn = {
        let registry = registry.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let id = registry.register(
                    &catalog(),
                    Arc::new(FixedProbe {
                        ready: HealthResponse::up("No issue detected."),
                    }),
                );
                tokio::task::yield_now().await;
                registry.deregister(id);
            }
        })
    };

    let checks: Vec<_> = (0..50)
        .map(|i| {
            let engine = engine.clone();
            let probe_type = if i % 2 == 0 {
                ProbeType::Readiness
            } else {
                ProbeType::Liveness
            };
            tokio::spawn(async move { engine.check(probe_type).await })
        })
        .collect();

    for check in checks {
        assert!(check.await.unwrap().is_up());
    }
    churn.await.unwrap();
}

#[tokio::test]
async fn uninstalled_module_drops_its_probes() {
    let (engine, registry, host) = setup(
        readiness_config(&["com.acme.catalog"]),
        HostSnapshot {
            modules: vec![catalog()],
            ..HostSnapshot::default()
        },
    );
    registry.register(
        &catalog(),
        Arc::new(FixedProbe {
            ready: HealthResponse::down("storage", vec!["disk full".into()]),
        }),
    );
    assert_eq!(engine.readiness().await.status(), HealthStatus::Down);

    host.uninstall(12);
    registry.deregister_module(12);
    host.install(catalog());
    assert!(engine.readiness().await.is_up());
}

#[tokio::test]
async fn down_verdict_without_issues_fails_the_check() {
    let (engine, registry, _) = setup(
        readiness_config(&["com.acme.catalog"]),
        HostSnapshot {
            modules: vec![catalog()],
            ..HostSnapshot::default()
        },
    );
    registry.register(
        &catalog(),
        Arc::new(FixedProbe {
            ready: HealthResponse::down("db unreachable", vec![]),
        }),
    );

    let response = engine.check(ProbeType::Readiness).await;
    assert_eq!(response.status(), HealthStatus::Down);
    assert_eq!(
        response.issues(),
        &["Bundle [com.acme.catalog] declares being DOWN: db unreachable".to_string()]
    );
}

struct BlockingProbe;

#[async_trait]
impl HealthProbe for BlockingProbe {
    async fn is_ready(&self) -> anyhow::Result<HealthResponse> {
        std::thread::sleep(Duration::from_secs(1));
        Ok(HealthResponse::up("No issue detected."))
    }

    async fn is_live(&self) -> anyhow::Result<HealthResponse> {
        Ok(HealthResponse::up("No issue detected."))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn thread_blocking_check_times_out() {
    let (engine, registry, _) = setup(
        Config {
            probe_timeout_ms: 100,
            ..readiness_config(&["com.acme.catalog"])
        },
        HostSnapshot {
            modules: vec![catalog()],
            ..HostSnapshot::default()
        },
    );
    registry.register(&catalog(), Arc::new(BlockingProbe));

    let start = Instant::now();
    let response = engine.check(ProbeType::Readiness).await;
    assert!(start.elapsed() < Duration::from_millis(900));
    assert_eq!(response.status(), HealthStatus::Down);
    assert_eq!(
        response.issues(),
        &["Health probe of bundle [com.acme.catalog] timed out after 100ms".to_string()]
    );
}
