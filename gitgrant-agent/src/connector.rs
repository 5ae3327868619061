//! Connectors bind a desired-state record to an external client.
//!
//! Each connect runs the same short pipeline: kind check, usage tracking,
//! config resolution, client construction. The first failure short-circuits.
//! Resolution happens on every connect — clients and credentials are never
//! cached, so a rotated credential takes effect on the very next cycle.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use gitgrant_api::{
    ConfigStore, ConfigUsage, CredentialSource, ProviderConfig, Record, RecordKind, StoreError,
};

use crate::client::{ApiClient, ApiError};
use crate::reconciler::permission::PermissionExternal;
use crate::reconciler::repository::RepositoryExternal;
use crate::reconciler::ExternalClient;

/// Errors from binding a record to an external client.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Wiring error: the record is of a kind this connector does not serve.
    #[error("record is not a {expected} resource (got {got})")]
    WrongKind {
        expected: RecordKind,
        got: RecordKind,
    },

    #[error("cannot track provider config usage")]
    TrackUsage(#[source] StoreError),

    #[error("cannot resolve provider config")]
    ResolveConfig(#[source] StoreError),

    #[error("credential variable {0} is not set")]
    MissingCredential(String),

    #[error("cannot build api client")]
    BuildClient(#[source] ApiError),
}

/// Transport endpoint plus credential, resolved fresh on every connect and
/// discarded with the client it backs.
#[derive(Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub token: String,
}

fn resolve(config: &ProviderConfig) -> Result<ResolvedConfig, ConnectError> {
    let token = match &config.credentials {
        CredentialSource::Inline { token } => token.clone(),
        CredentialSource::Env { var } => {
            std::env::var(var).map_err(|_| ConnectError::MissingCredential(var.clone()))?
        }
    };
    Ok(ResolvedConfig {
        endpoint: config.endpoint.clone(),
        token,
    })
}

/// Produces an external client for records of one kind.
#[async_trait]
pub trait Connector: Send + Sync {
    /// The record kind this connector serves.
    fn kind(&self) -> RecordKind;

    /// Track usage, resolve the referenced provider config, and return a
    /// bound client. The usage entry persists regardless of cycle outcome.
    async fn connect(&self, record: &Record) -> Result<Box<dyn ExternalClient>, ConnectError>;
}

async fn resolve_for(
    configs: &dyn ConfigStore,
    record: &Record,
) -> Result<ApiClient, ConnectError> {
    configs
        .track_usage(ConfigUsage::for_record(record))
        .await
        .map_err(ConnectError::TrackUsage)?;

    let config = configs
        .get_config(&record.provider_config_ref().name)
        .await
        .map_err(ConnectError::ResolveConfig)?;

    let resolved = resolve(&config)?;
    ApiClient::new(&resolved.endpoint, &resolved.token).map_err(ConnectError::BuildClient)
}

pub struct PermissionConnector {
    configs: Arc<dyn ConfigStore>,
}

impl PermissionConnector {
    pub fn new(configs: Arc<dyn ConfigStore>) -> Self {
        Self { configs }
    }
}

#[async_trait]
impl Connector for PermissionConnector {
    fn kind(&self) -> RecordKind {
        RecordKind::RepositoryPermission
    }

    async fn connect(&self, record: &Record) -> Result<Box<dyn ExternalClient>, ConnectError> {
        if record.as_permission().is_none() {
            return Err(ConnectError::WrongKind {
                expected: RecordKind::RepositoryPermission,
                got: record.kind(),
            });
        }
        let api = resolve_for(self.configs.as_ref(), record).await?;
        Ok(Box::new(PermissionExternal::new(api)))
    }
}

pub struct RepositoryConnector {
    configs: Arc<dyn ConfigStore>,
}

impl RepositoryConnector {
    pub fn new(configs: Arc<dyn ConfigStore>) -> Self {
        Self { configs }
    }
}

#[async_trait]
impl Connector for RepositoryConnector {
    fn kind(&self) -> RecordKind {
        RecordKind::Repository
    }

    async fn connect(&self, record: &Record) -> Result<Box<dyn ExternalClient>, ConnectError> {
        if record.as_repository().is_none() {
            return Err(ConnectError::WrongKind {
                expected: RecordKind::Repository,
                got: record.kind(),
            });
        }
        let api = resolve_for(self.configs.as_ref(), record).await?;
        Ok(Box::new(RepositoryExternal::new(api)))
    }
}
