// src/lib.rs
pub mod config;
pub mod error;
pub mod graph;
pub mod health;
pub mod host;
pub mod metrics;
pub mod modules;
pub mod probe;
pub mod server;

pub use health::{HealthEngine, HealthResponse, HealthStatus, ProbeType};
pub use probe::{HealthProbe, ProbeRegistry};
