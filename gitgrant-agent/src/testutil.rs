//! In-memory fakes of the upstream API for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use gitgrant_api::{
    ConfigReference, PermissionLevel, PermissionRecord, PermissionSpec, Record, RecordKind,
    RecordMeta, RecordStatus, RepositoryRecord, RepositorySpec,
};

use crate::client::{
    ApiError, CreatePermission, PermissionGrant, PermissionKey, PermissionsApi, RepositoriesApi,
    RepositoryObject, RepositoryParams,
};
use crate::connector::{ConnectError, Connector};
use crate::reconciler::permission::PermissionExternal;
use crate::reconciler::ExternalClient;

pub(crate) fn permission_record(
    org: &str,
    repo: &str,
    team: &str,
    permission: PermissionLevel,
) -> Record {
    Record::RepositoryPermission(PermissionRecord {
        meta: RecordMeta::new(format!("{team}-{repo}-{permission}")),
        spec: PermissionSpec {
            organization: org.into(),
            repository: repo.into(),
            team: team.into(),
            permission,
            provider_config_ref: ConfigReference::new("default"),
        },
        status: RecordStatus::default(),
    })
}

pub(crate) fn repository_record(org: &str, name: &str) -> Record {
    Record::Repository(RepositoryRecord {
        meta: RecordMeta::new(name),
        spec: RepositorySpec {
            organization: org.into(),
            name: name.into(),
            private: false,
            description: Some("managed by gitgrant".into()),
            provider_config_ref: ConfigReference::new("default"),
        },
        status: RecordStatus::default(),
    })
}

#[derive(Default)]
struct FakePermissionsState {
    grants: HashMap<(String, String, String), PermissionLevel>,
    fail_status: Option<u16>,
}

/// Shared-state fake of the grant API. Cloning shares the same state.
#[derive(Clone, Default)]
pub(crate) struct FakePermissions {
    inner: Arc<Mutex<FakePermissionsState>>,
}

impl FakePermissions {
    /// Make every subsequent call fail with the given HTTP status.
    pub(crate) fn fail_with(&self, status: u16) {
        self.inner.lock().unwrap().fail_status = Some(status);
    }

    pub(crate) fn grant(&self, org: &str, team: &str, repo: &str) -> Option<PermissionLevel> {
        self.inner
            .lock()
            .unwrap()
            .grants
            .get(&(org.to_string(), team.to_string(), repo.to_string()))
            .copied()
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        if let Some(status) = self.inner.lock().unwrap().fail_status {
            return Err(ApiError::Api {
                status,
                message: "injected failure".into(),
            });
        }
        Ok(())
    }
}

fn key_tuple(key: &PermissionKey) -> (String, String, String) {
    (
        key.organization.clone(),
        key.team.clone(),
        key.repository.clone(),
    )
}

#[async_trait]
impl PermissionsApi for FakePermissions {
    async fn get_permission(&self, key: &PermissionKey) -> Result<PermissionGrant, ApiError> {
        self.check_failure()?;
        let inner = self.inner.lock().unwrap();
        inner
            .grants
            .get(&key_tuple(key))
            .map(|permission| PermissionGrant {
                organization: key.organization.clone(),
                team: key.team.clone(),
                repository: key.repository.clone(),
                permission: *permission,
            })
            .ok_or(ApiError::NotFound)
    }

    async fn create_permission(&self, params: &CreatePermission) -> Result<(), ApiError> {
        self.check_failure()?;
        self.inner
            .lock()
            .unwrap()
            .grants
            .insert(key_tuple(&params.key), params.permission);
        Ok(())
    }

    async fn delete_permission(&self, key: &PermissionKey) -> Result<(), ApiError> {
        self.check_failure()?;
        self.inner
            .lock()
            .unwrap()
            .grants
            .remove(&key_tuple(key))
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }
}

/// Shared-state fake of the repository API.
#[derive(Clone, Default)]
pub(crate) struct FakeRepositories {
    inner: Arc<Mutex<HashMap<(String, String), RepositoryObject>>>,
}

impl FakeRepositories {
    pub(crate) fn set_private(&self, org: &str, name: &str, private: bool) {
        if let Some(repo) = self
            .inner
            .lock()
            .unwrap()
            .get_mut(&(org.to_string(), name.to_string()))
        {
            repo.private = private;
        }
    }
}

#[async_trait]
impl RepositoriesApi for FakeRepositories {
    async fn get_repository(
        &self,
        organization: &str,
        name: &str,
    ) -> Result<RepositoryObject, ApiError> {
        self.inner
            .lock()
            .unwrap()
            .get(&(organization.to_string(), name.to_string()))
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create_repository(&self, params: &RepositoryParams) -> Result<(), ApiError> {
        self.inner.lock().unwrap().insert(
            (params.organization.clone(), params.name.clone()),
            RepositoryObject {
                organization: params.organization.clone(),
                name: params.name.clone(),
                private: params.private,
                description: params.description.clone(),
            },
        );
        Ok(())
    }

    async fn update_repository(&self, params: &RepositoryParams) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let repo = inner
            .get_mut(&(params.organization.clone(), params.name.clone()))
            .ok_or(ApiError::NotFound)?;
        repo.private = params.private;
        repo.description = params.description.clone();
        Ok(())
    }

    async fn delete_repository(&self, organization: &str, name: &str) -> Result<(), ApiError> {
        self.inner
            .lock()
            .unwrap()
            .remove(&(organization.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or(ApiError::NotFound)
    }
}

/// Connector that binds permission records straight to a `FakePermissions`,
/// skipping config resolution. For driver tests.
pub(crate) struct FakePermissionConnector {
    pub(crate) api: FakePermissions,
}

#[async_trait]
impl Connector for FakePermissionConnector {
    fn kind(&self) -> RecordKind {
        RecordKind::RepositoryPermission
    }

    async fn connect(&self, record: &Record) -> Result<Box<dyn ExternalClient>, ConnectError> {
        if record.as_permission().is_none() {
            return Err(ConnectError::WrongKind {
                expected: RecordKind::RepositoryPermission,
                got: record.kind(),
            });
        }
        Ok(Box::new(PermissionExternal::new(self.api.clone())))
    }
}
