//! Desired-state document loading.
//!
//! The cluster configuration store proper is an external collaborator; the
//! agent stands one in by loading a JSON document of provider configs and
//! records into the in-memory store at startup.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gitgrant_api::{ConfigStore, MemoryStore, ProviderConfig, Record, RecordStore};

/// Top-level state document.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    #[serde(default)]
    pub provider_configs: Vec<ProviderConfig>,
    #[serde(default)]
    pub records: Vec<Record>,
}

pub async fn load(path: &Path) -> Result<StateDocument> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read state document {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("cannot parse state document {}", path.display()))
}

pub async fn seed(store: &MemoryStore, document: StateDocument) -> Result<()> {
    for config in document.provider_configs {
        store
            .put_config(config)
            .await
            .context("cannot seed provider config")?;
    }
    for record in document.records {
        store.put(record).await.context("cannot seed record")?;
    }
    Ok(())
}
