//! Timestamped status conditions reported on desired-state records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Condition categories tracked on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionType {
    /// Whether the external object exists and is usable.
    Ready,
    /// Whether the last reconciliation pass completed without error.
    Synced,
}

/// Tri-state condition status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

/// Machine-readable reason for a condition's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionReason {
    Available,
    Creating,
    Deleting,
    Unavailable,
    ReconcileSuccess,
    ReconcileError,
}

/// One observed condition of a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub status: ConditionStatus,
    pub reason: ConditionReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_transition_time: DateTime<Utc>,
}

impl Condition {
    fn new(
        condition_type: ConditionType,
        status: ConditionStatus,
        reason: ConditionReason,
        message: Option<String>,
    ) -> Self {
        Self {
            condition_type,
            status,
            reason,
            message,
            last_transition_time: Utc::now(),
        }
    }

    /// The external object exists.
    pub fn available() -> Self {
        Self::new(
            ConditionType::Ready,
            ConditionStatus::True,
            ConditionReason::Available,
            None,
        )
    }

    /// The external object is being created.
    pub fn creating() -> Self {
        Self::new(
            ConditionType::Ready,
            ConditionStatus::False,
            ConditionReason::Creating,
            None,
        )
    }

    /// The external object is being deleted.
    pub fn deleting() -> Self {
        Self::new(
            ConditionType::Ready,
            ConditionStatus::False,
            ConditionReason::Deleting,
            None,
        )
    }

    /// The external object is not usable.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            ConditionType::Ready,
            ConditionStatus::False,
            ConditionReason::Unavailable,
            Some(message.into()),
        )
    }

    /// The last reconciliation pass succeeded.
    pub fn reconcile_success() -> Self {
        Self::new(
            ConditionType::Synced,
            ConditionStatus::True,
            ConditionReason::ReconcileSuccess,
            None,
        )
    }

    /// The last reconciliation pass failed.
    pub fn reconcile_error(message: impl Into<String>) -> Self {
        Self::new(
            ConditionType::Synced,
            ConditionStatus::False,
            ConditionReason::ReconcileError,
            Some(message.into()),
        )
    }
}
