//! Reconciliation strategy for team permission grants.
//!
//! Grants are immutable upstream: the only legal mutation is delete and
//! recreate, which this strategy does not perform. `update` is therefore a
//! no-op, and observation checks existence only — a spec edit after creation
//! (say, `admin` lowered to `read`) is never detected as drift.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use gitgrant_api::{Condition, PermissionRecord, Record};

use crate::client::{ApiError, CreatePermission, PermissionKey, PermissionsApi};

use super::{Creation, ExternalClient, Observation, Update};

pub struct PermissionExternal<C> {
    api: C,
}

impl<C> PermissionExternal<C> {
    pub fn new(api: C) -> Self {
        Self { api }
    }
}

fn as_permission_mut(record: &mut Record) -> Result<&mut PermissionRecord> {
    let kind = record.kind();
    match record.as_permission_mut() {
        Some(cr) => Ok(cr),
        None => bail!("expected a RepositoryPermission record, got {kind}"),
    }
}

fn key_for(cr: &PermissionRecord) -> PermissionKey {
    PermissionKey {
        organization: cr.spec.organization.clone(),
        team: cr.spec.team.clone(),
        repository: cr.spec.repository.clone(),
    }
}

#[async_trait]
impl<C: PermissionsApi> ExternalClient for PermissionExternal<C> {
    async fn observe(&self, record: &mut Record) -> Result<Observation> {
        let cr = as_permission_mut(record)?;
        match self.api.get_permission(&key_for(cr)).await {
            Ok(_) => {
                cr.status.set_condition(Condition::available());
                Ok(Observation {
                    exists: true,
                    up_to_date: true,
                })
            }
            Err(e) if e.is_not_found() => {
                debug!(record = %cr.meta.id, "permission grant absent upstream");
                Ok(Observation::default())
            }
            Err(e) => Err(e).with_context(|| {
                format!("cannot get permission grant for record {}", cr.meta.id)
            }),
        }
    }

    async fn create(&self, record: &mut Record) -> Result<Creation> {
        let cr = as_permission_mut(record)?;
        self.api
            .create_permission(&CreatePermission {
                key: key_for(cr),
                permission: cr.spec.permission,
            })
            .await
            .with_context(|| {
                format!("cannot create permission grant for record {}", cr.meta.id)
            })?;

        // No server-assigned id exists; the repository identifier is the
        // external identity.
        cr.meta.external_name = Some(cr.spec.repository.clone());
        info!(
            record = %cr.meta.id,
            org = %cr.spec.organization,
            team = %cr.spec.team,
            repo = %cr.spec.repository,
            permission = %cr.spec.permission,
            "created permission grant"
        );
        Ok(Creation::default())
    }

    async fn update(&self, _record: &mut Record) -> Result<Update> {
        // Grants cannot be updated in place; spec changes are not corrected.
        Ok(Update)
    }

    async fn delete(&self, record: &mut Record) -> Result<()> {
        let cr = as_permission_mut(record)?;
        match self.api.delete_permission(&key_for(cr)).await {
            Ok(()) | Err(ApiError::NotFound) => {
                info!(record = %cr.meta.id, repo = %cr.spec.repository, "permission grant deleted");
                Ok(())
            }
            Err(e) => Err(e).with_context(|| {
                format!("cannot delete permission grant for record {}", cr.meta.id)
            }),
        }
    }
}
