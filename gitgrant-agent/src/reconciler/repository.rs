//! Reconciliation strategy for repositories.
//!
//! Repositories have server-side mutable fields (`private`, `description`),
//! so observation compares the remote object against the spec and update
//! issues a corrective PATCH.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use gitgrant_api::{Condition, Record, RepositoryRecord};

use crate::client::{ApiError, RepositoriesApi, RepositoryParams};

use super::{Creation, ExternalClient, Observation, Update};

pub struct RepositoryExternal<C> {
    api: C,
}

impl<C> RepositoryExternal<C> {
    pub fn new(api: C) -> Self {
        Self { api }
    }
}

fn as_repository_mut(record: &mut Record) -> Result<&mut RepositoryRecord> {
    let kind = record.kind();
    match record.as_repository_mut() {
        Some(cr) => Ok(cr),
        None => bail!("expected a Repository record, got {kind}"),
    }
}

fn params_for(cr: &RepositoryRecord) -> RepositoryParams {
    RepositoryParams {
        organization: cr.spec.organization.clone(),
        name: cr.spec.name.clone(),
        private: cr.spec.private,
        description: cr.spec.description.clone(),
    }
}

#[async_trait]
impl<C: RepositoriesApi> ExternalClient for RepositoryExternal<C> {
    async fn observe(&self, record: &mut Record) -> Result<Observation> {
        let cr = as_repository_mut(record)?;
        match self
            .api
            .get_repository(&cr.spec.organization, &cr.spec.name)
            .await
        {
            Ok(remote) => {
                cr.status.set_condition(Condition::available());
                let up_to_date =
                    remote.private == cr.spec.private && remote.description == cr.spec.description;
                if !up_to_date {
                    debug!(record = %cr.meta.id, repo = %cr.spec.name, "repository drifted from spec");
                }
                Ok(Observation {
                    exists: true,
                    up_to_date,
                })
            }
            Err(e) if e.is_not_found() => Ok(Observation::default()),
            Err(e) => {
                Err(e).with_context(|| format!("cannot get repository for record {}", cr.meta.id))
            }
        }
    }

    async fn create(&self, record: &mut Record) -> Result<Creation> {
        let cr = as_repository_mut(record)?;
        self.api
            .create_repository(&params_for(cr))
            .await
            .with_context(|| format!("cannot create repository for record {}", cr.meta.id))?;

        cr.meta.external_name = Some(cr.spec.name.clone());
        info!(record = %cr.meta.id, org = %cr.spec.organization, repo = %cr.spec.name, "created repository");
        Ok(Creation::default())
    }

    async fn update(&self, record: &mut Record) -> Result<Update> {
        let cr = as_repository_mut(record)?;
        self.api
            .update_repository(&params_for(cr))
            .await
            .with_context(|| format!("cannot update repository for record {}", cr.meta.id))?;
        info!(record = %cr.meta.id, repo = %cr.spec.name, "updated repository");
        Ok(Update)
    }

    async fn delete(&self, record: &mut Record) -> Result<()> {
        let cr = as_repository_mut(record)?;
        match self
            .api
            .delete_repository(&cr.spec.organization, &cr.spec.name)
            .await
        {
            Ok(()) | Err(ApiError::NotFound) => {
                info!(record = %cr.meta.id, repo = %cr.spec.name, "repository deleted");
                Ok(())
            }
            Err(e) => {
                Err(e).with_context(|| format!("cannot delete repository for record {}", cr.meta.id))
            }
        }
    }
}
