//! Reconciliation strategies for managed record kinds.
//!
//! Each strategy implements the four-operation contract the cycle driver
//! calls: observe the external object, then create, update, or delete it so
//! it converges on the record's spec. Every operation must be safe to invoke
//! repeatedly and re-derives everything from the record's current content.

pub mod permission;
pub mod repository;

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use gitgrant_api::Record;

/// What observe learned about the external object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Observation {
    /// The external object exists.
    pub exists: bool,
    /// The external object matches the record's spec; only meaningful when
    /// `exists` is true.
    pub up_to_date: bool,
}

/// Result of creating the external object. Connection details are secrets
/// the engine may publish; empty for the kinds managed here.
#[derive(Debug, Clone, Default)]
pub struct Creation {
    pub connection_details: HashMap<String, String>,
}

/// Result of updating the external object.
#[derive(Debug, Clone, Copy, Default)]
pub struct Update;

/// One external resource kind's reconciliation strategy, bound to a resolved
/// provider config by the connector. Owned by a single cycle; never shared
/// or retained.
#[async_trait]
pub trait ExternalClient: Send + Sync {
    /// Check whether the external object exists and matches the spec.
    /// Mutates only status conditions.
    async fn observe(&self, record: &mut Record) -> Result<Observation>;

    /// Create the external object and bind the record's external identity.
    async fn create(&self, record: &mut Record) -> Result<Creation>;

    /// Correct drift on the external object.
    async fn update(&self, record: &mut Record) -> Result<Update>;

    /// Delete the external object; an already-absent object is success.
    async fn delete(&self, record: &mut Record) -> Result<()>;
}

impl std::fmt::Debug for dyn ExternalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ExternalClient")
    }
}
