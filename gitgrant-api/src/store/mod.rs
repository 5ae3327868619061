//! Store trait definitions.
//!
//! These traits abstract the cluster configuration store, allowing the agent
//! to work with domain objects regardless of where the desired state lives.

mod error;
mod memory;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::provider::{ConfigUsage, ProviderConfig};
use crate::record::Record;

/// Access to desired-state records. The engine persists status and identity
/// mutations through `put` after each cycle; `delete` purges a finalized
/// record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Record>>;
    async fn get(&self, id: &str) -> Result<Record>;
    async fn put(&self, record: Record) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Access to provider configurations and their usage tracking.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get_config(&self, name: &str) -> Result<ProviderConfig>;
    async fn put_config(&self, config: ProviderConfig) -> Result<()>;
    /// Upserts the usage entry for the record, keyed by record id.
    async fn track_usage(&self, usage: ConfigUsage) -> Result<()>;
    async fn usages(&self) -> Result<Vec<ConfigUsage>>;
}
