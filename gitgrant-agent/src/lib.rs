//! gitgrant-agent: keeps external objects on a code-hosting service in sync
//! with declarative desired-state records.
//!
//! The agent:
//! - Loads desired-state records and provider configs from a state document
//! - Binds each record to a freshly resolved provider config on every cycle
//! - Runs Observe/Create/Update/Delete strategies per record kind
//! - Persists status conditions and external-identity bindings back to the store

pub mod agent;
pub mod client;
pub mod connector;
pub mod events;
pub mod reconciler;
pub mod registry;
pub mod state;

#[cfg(test)]
pub(crate) mod testutil;
