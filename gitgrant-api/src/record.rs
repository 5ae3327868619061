//! Desired-state records: user-declared specifications of external objects,
//! plus the status the agent observes for them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::condition::{Condition, ConditionType};
use crate::provider::ConfigReference;

/// Kind discriminator for desired-state records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    RepositoryPermission,
    Repository,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::RepositoryPermission => write!(f, "RepositoryPermission"),
            RecordKind::Repository => write!(f, "Repository"),
        }
    }
}

/// Metadata shared by all record kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Set when the user requests deletion; the record is purged only after
    /// finalization succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<DateTime<Utc>>,
    /// Identity of the corresponding external object, bound on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_name: Option<String>,
}

impl RecordMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now(),
            deletion_timestamp: None,
            external_name: None,
        }
    }

    /// Mark the record for deletion, triggering finalization next cycle.
    pub fn request_deletion(&mut self) {
        if self.deletion_timestamp.is_none() {
            self.deletion_timestamp = Some(Utc::now());
        }
    }
}

/// Access level granted to a team on a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Read,
    Write,
    Maintain,
    Admin,
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionLevel::Read => "read",
            PermissionLevel::Write => "write",
            PermissionLevel::Maintain => "maintain",
            PermissionLevel::Admin => "admin",
        };
        write!(f, "{s}")
    }
}

/// Desired state of one team permission grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSpec {
    pub organization: String,
    pub repository: String,
    pub team: String,
    pub permission: PermissionLevel,
    pub provider_config_ref: ConfigReference,
}

/// Desired state of one repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySpec {
    pub organization: String,
    pub name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub provider_config_ref: ConfigReference,
}

/// Observed status of a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl RecordStatus {
    /// Replace the condition of the same type, keeping the transition time
    /// when the status value is unchanged.
    pub fn set_condition(&mut self, condition: Condition) {
        match self
            .conditions
            .iter_mut()
            .find(|c| c.condition_type == condition.condition_type)
        {
            Some(existing) => {
                let transition_time = if existing.status == condition.status {
                    existing.last_transition_time
                } else {
                    condition.last_transition_time
                };
                *existing = condition;
                existing.last_transition_time = transition_time;
            }
            None => self.conditions.push(condition),
        }
    }

    pub fn condition(&self, condition_type: ConditionType) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
    }
}

/// A team permission grant record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub meta: RecordMeta,
    pub spec: PermissionSpec,
    #[serde(default)]
    pub status: RecordStatus,
}

/// A repository record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub meta: RecordMeta,
    pub spec: RepositorySpec,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Tagged union over all managed record kinds. The agent dispatches on the
/// variant at the engine boundary; strategies only ever see their own kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Record {
    RepositoryPermission(PermissionRecord),
    Repository(RepositoryRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::RepositoryPermission(_) => RecordKind::RepositoryPermission,
            Record::Repository(_) => RecordKind::Repository,
        }
    }

    pub fn meta(&self) -> &RecordMeta {
        match self {
            Record::RepositoryPermission(r) => &r.meta,
            Record::Repository(r) => &r.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut RecordMeta {
        match self {
            Record::RepositoryPermission(r) => &mut r.meta,
            Record::Repository(r) => &mut r.meta,
        }
    }

    pub fn id(&self) -> &str {
        &self.meta().id
    }

    pub fn name(&self) -> &str {
        &self.meta().name
    }

    pub fn status(&self) -> &RecordStatus {
        match self {
            Record::RepositoryPermission(r) => &r.status,
            Record::Repository(r) => &r.status,
        }
    }

    pub fn status_mut(&mut self) -> &mut RecordStatus {
        match self {
            Record::RepositoryPermission(r) => &mut r.status,
            Record::Repository(r) => &mut r.status,
        }
    }

    pub fn provider_config_ref(&self) -> &ConfigReference {
        match self {
            Record::RepositoryPermission(r) => &r.spec.provider_config_ref,
            Record::Repository(r) => &r.spec.provider_config_ref,
        }
    }

    pub fn deletion_requested(&self) -> bool {
        self.meta().deletion_timestamp.is_some()
    }

    pub fn as_permission(&self) -> Option<&PermissionRecord> {
        match self {
            Record::RepositoryPermission(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_permission_mut(&mut self) -> Option<&mut PermissionRecord> {
        match self {
            Record::RepositoryPermission(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_repository(&self) -> Option<&RepositoryRecord> {
        match self {
            Record::Repository(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_repository_mut(&mut self) -> Option<&mut RepositoryRecord> {
        match self {
            Record::Repository(r) => Some(r),
            _ => None,
        }
    }
}
