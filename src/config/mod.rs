// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load configuration from a file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config: Config = read_document(path).await?;
    config.validate()?;
    Ok(config)
}

/// Read a YAML (`.yaml`/`.yml`) or JSON document.
pub async fn read_document<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&contents).context("Failed to parse YAML document")
    } else {
        serde_json::from_str(&contents).context("Failed to parse JSON document")
    }
}
