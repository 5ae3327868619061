//! Shared types for gitgrant: desired-state records, status conditions,
//! provider configuration, and the store traits the agent consumes.

pub mod condition;
pub mod provider;
pub mod record;
pub mod store;

pub use condition::{Condition, ConditionReason, ConditionStatus, ConditionType};
pub use provider::{ConfigReference, ConfigUsage, CredentialSource, ProviderConfig};
pub use record::{
    PermissionLevel, PermissionRecord, PermissionSpec, Record, RecordKind, RecordMeta,
    RecordStatus, RepositoryRecord, RepositorySpec,
};
pub use store::{ConfigStore, MemoryStore, RecordStore, StoreError};
