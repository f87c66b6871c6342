// src/health/response.rs
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

impl HealthStatus {
    pub fn is_up(self) -> bool {
        self == HealthStatus::Up
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Up => f.write_str("UP"),
            HealthStatus::Down => f.write_str("DOWN"),
        }
    }
}

/// Which question a check answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeType {
    Readiness,
    Liveness,
}

impl ProbeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProbeType::Readiness => "readiness",
            ProbeType::Liveness => "liveness",
        }
    }
}

impl fmt::Display for ProbeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of the readiness and liveness endpoints: a status, a summary message
/// and the issues detected, if any.
///
/// Built once per check and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    status: HealthStatus,
    message: String,
    #[serde(default)]
    issues: Vec<String>,
}

impl HealthResponse {
    pub fn new(status: HealthStatus, message: impl Into<String>, issues: Vec<String>) -> Self {
        Self {
            status,
            message: message.into(),
            issues,
        }
    }

    pub fn up(message: impl Into<String>) -> Self {
        Self::new(HealthStatus::Up, message, Vec::new())
    }

    pub fn down(message: impl Into<String>, issues: Vec<String>) -> Self {
        Self::new(HealthStatus::Down, message, issues)
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }

    pub fn into_issues(self) -> Vec<String> {
        self.issues
    }

    pub fn to_json(&self) -> String {
        // Only strings and a unit enum: serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}
