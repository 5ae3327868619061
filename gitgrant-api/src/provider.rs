//! Provider configuration: where the upstream service lives and how to
//! authenticate against it, plus usage tracking for garbage collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{Record, RecordKind};

/// Reference from a record to a named provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigReference {
    pub name: String,
}

impl ConfigReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Where the credential token comes from.
///
/// Secret-store backends are out of scope; an environment variable is the
/// indirection used for anything that must not live in the state document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum CredentialSource {
    /// Token written directly into the configuration.
    Inline { token: String },
    /// Token read from an environment variable at resolution time.
    Env { var: String },
}

/// A named endpoint + credential pair records can reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub name: String,
    pub endpoint: String,
    pub credentials: CredentialSource,
}

/// Usage-tracking entry: which record currently relies on which provider
/// configuration. Persisted on every connect, before resolution, so the
/// configuration is not collected while a record still references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUsage {
    pub record_id: String,
    pub record_kind: RecordKind,
    pub config_name: String,
    pub tracked_at: DateTime<Utc>,
}

impl ConfigUsage {
    pub fn for_record(record: &Record) -> Self {
        Self {
            record_id: record.id().to_string(),
            record_kind: record.kind(),
            config_name: record.provider_config_ref().name.clone(),
            tracked_at: Utc::now(),
        }
    }
}
