//! Permission-grant operations.
//!
//! Grants carry no server-assigned id: identity is the (organization, team,
//! repository) tuple, and "exists" means an exact match on that key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use gitgrant_api::PermissionLevel;

use super::{ApiClient, ApiError};

/// Structural key identifying one grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionKey {
    pub organization: String,
    pub team: String,
    pub repository: String,
}

impl PermissionKey {
    fn path(&self) -> String {
        format!(
            "/v1/orgs/{}/teams/{}/repos/{}/permission",
            self.organization, self.team, self.repository
        )
    }
}

/// A grant as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGrant {
    pub organization: String,
    pub team: String,
    pub repository: String,
    pub permission: PermissionLevel,
}

/// Full creation parameters.
#[derive(Debug, Clone)]
pub struct CreatePermission {
    pub key: PermissionKey,
    pub permission: PermissionLevel,
}

#[derive(Serialize)]
struct GrantBody {
    permission: PermissionLevel,
}

/// Grant operations against the upstream service.
#[async_trait]
pub trait PermissionsApi: Send + Sync {
    async fn get_permission(&self, key: &PermissionKey) -> Result<PermissionGrant, ApiError>;
    async fn create_permission(&self, params: &CreatePermission) -> Result<(), ApiError>;
    async fn delete_permission(&self, key: &PermissionKey) -> Result<(), ApiError>;
}

#[async_trait]
impl PermissionsApi for ApiClient {
    async fn get_permission(&self, key: &PermissionKey) -> Result<PermissionGrant, ApiError> {
        self.get_json(&key.path()).await
    }

    async fn create_permission(&self, params: &CreatePermission) -> Result<(), ApiError> {
        self.put_json(
            &params.key.path(),
            &GrantBody {
                permission: params.permission,
            },
        )
        .await
    }

    async fn delete_permission(&self, key: &PermissionKey) -> Result<(), ApiError> {
        self.delete_path(&key.path()).await
    }
}
