// src/health/mod.rs
mod components;
mod engine;
mod response;

pub use components::ComponentHealthAggregator;
pub use engine::HealthEngine;
pub use response::{HealthResponse, HealthStatus, ProbeType};
