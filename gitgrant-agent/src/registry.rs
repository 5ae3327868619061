//! Kind-indexed connector registry.
//!
//! Built once in `main` and passed by reference to the cycle driver; there is
//! no process-wide mutable scheme.

use std::collections::HashMap;

use gitgrant_api::RecordKind;

use crate::connector::Connector;

#[derive(Default)]
pub struct Registry {
    connectors: HashMap<RecordKind, Box<dyn Connector>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connector under the kind it serves. A later registration
    /// for the same kind replaces the earlier one.
    pub fn register(&mut self, connector: Box<dyn Connector>) -> &mut Self {
        self.connectors.insert(connector.kind(), connector);
        self
    }

    pub fn connector_for(&self, kind: RecordKind) -> Option<&dyn Connector> {
        self.connectors.get(&kind).map(|c| c.as_ref())
    }

    pub fn kinds(&self) -> impl Iterator<Item = RecordKind> + '_ {
        self.connectors.keys().copied()
    }
}
