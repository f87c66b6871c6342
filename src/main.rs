// src/main.rs
use anyhow::Result;
use module_health::{
    config::{self, read_document, Config},
    host::{HostSnapshot, StaticModuleHost},
    metrics::MetricsRegistry,
    server::{HealthHandler, ServerBuilder},
    HealthEngine, ProbeRegistry,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("module_health=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;

    let host = Arc::new(StaticModuleHost::new(load_host(&config).await?));

    // Initialize metrics
    let metrics_registry = Arc::new(MetricsRegistry::new()?);
    let metrics = config
        .metrics
        .enabled
        .then(|| metrics_registry.collector());

    // Modules contribute probes here when embedded in a host.
    let probes = ProbeRegistry::new();

    let engine = Arc::new(HealthEngine::for_host(
        config.clone(),
        host.clone(),
        probes,
        metrics,
    ));

    #[cfg(unix)]
    spawn_reloader(config_path, engine.clone(), host);

    let mut handler = HealthHandler::new(engine);
    if config.metrics.enabled {
        info!("Serving metrics on {}", config.metrics.path);
        handler = handler.with_metrics(metrics_registry);
    }

    info!("Starting health endpoints on {}", config.server.listen_addr);
    ServerBuilder::new(config.server.listen_addr)
        .with_handler(handler)
        .serve_with_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn load_host(config: &Config) -> Result<HostSnapshot> {
    match &config.host_snapshot {
        Some(path) => {
            info!("Loading module host snapshot from: {}", path.display());
            read_document(path).await
        }
        None => {
            warn!("No hostSnapshot configured, serving an empty module host");
            Ok(HostSnapshot::default())
        }
    }
}

// Re-read the configuration and host snapshot on SIGHUP.
#[cfg(unix)]
fn spawn_reloader(config_path: String, engine: Arc<HealthEngine>, host: Arc<StaticModuleHost>) {
    tokio::spawn(async move {
        let mut hangup = match signal::unix::signal(signal::unix::SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                error!("Failed to install SIGHUP handler: {}", e);
                return;
            }
        };

        while hangup.recv().await.is_some() {
            info!("SIGHUP received, reloading {}", config_path);
            let reloaded = async {
                let config = config::load_config(&config_path).await?;
                host.replace(load_host(&config).await?);
                engine.reconfigure(config);
                Ok::<_, anyhow::Error>(())
            };
            if let Err(e) = reloaded.await {
                error!("Reload failed, keeping previous configuration: {:#}", e);
            }
        }
    });
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
