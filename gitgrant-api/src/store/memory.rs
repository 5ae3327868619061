//! In-memory store, seeded from the desired-state document at startup.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::provider::{ConfigUsage, ProviderConfig};
use crate::record::Record;

use super::error::{Result, StoreError};
use super::{ConfigStore, RecordStore};

/// Hash-map backed store for records, provider configs, and usage entries.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Record>>,
    configs: RwLock<HashMap<String, ProviderConfig>>,
    usages: RwLock<HashMap<String, ConfigUsage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Record>> {
        let records = self.records.read().await;
        let mut all: Vec<Record> = records.values().cloned().collect();
        all.sort_by(|a, b| a.meta().created_at.cmp(&b.meta().created_at));
        Ok(all)
    }

    async fn get(&self, id: &str) -> Result<Record> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("record {id}")))
    }

    async fn put(&self, record: Record) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.id().to_string(), record);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.records
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("record {id}")))
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get_config(&self, name: &str) -> Result<ProviderConfig> {
        self.configs
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("provider config {name}")))
    }

    async fn put_config(&self, config: ProviderConfig) -> Result<()> {
        self.configs
            .write()
            .await
            .insert(config.name.clone(), config);
        Ok(())
    }

    async fn track_usage(&self, usage: ConfigUsage) -> Result<()> {
        self.usages
            .write()
            .await
            .insert(usage.record_id.clone(), usage);
        Ok(())
    }

    async fn usages(&self) -> Result<Vec<ConfigUsage>> {
        Ok(self.usages.read().await.values().cloned().collect())
    }
}
