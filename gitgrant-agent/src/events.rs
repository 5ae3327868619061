//! Engine-level events for user-visible record transitions.

use tracing::{info, warn};

use gitgrant_api::Record;

/// Emits one structured event per transition, keyed by record.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventRecorder;

impl EventRecorder {
    pub fn created(&self, record: &Record) {
        info!(
            kind = %record.kind(),
            record = %record.id(),
            name = %record.name(),
            "external object created"
        );
    }

    pub fn updated(&self, record: &Record) {
        info!(
            kind = %record.kind(),
            record = %record.id(),
            name = %record.name(),
            "external object updated"
        );
    }

    pub fn deleted(&self, record: &Record) {
        info!(
            kind = %record.kind(),
            record = %record.id(),
            name = %record.name(),
            "external object deleted"
        );
    }

    pub fn reconcile_failed(&self, record: &Record, err: &anyhow::Error) {
        warn!(
            kind = %record.kind(),
            record = %record.id(),
            name = %record.name(),
            error = format!("{err:#}"),
            "reconciliation failed"
        );
    }
}
