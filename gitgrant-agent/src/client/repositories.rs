//! Repository operations. Unlike grants, repositories have server-side
//! mutable fields and support in-place updates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

fn repo_path(organization: &str, name: &str) -> String {
    format!("/v1/orgs/{organization}/repos/{name}")
}

/// A repository as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryObject {
    pub organization: String,
    pub name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Parameters for creating or updating a repository.
#[derive(Debug, Clone)]
pub struct RepositoryParams {
    pub organization: String,
    pub name: String,
    pub private: bool,
    pub description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryBody<'a> {
    private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

impl RepositoryParams {
    fn body(&self) -> RepositoryBody<'_> {
        RepositoryBody {
            private: self.private,
            description: self.description.as_deref(),
        }
    }
}

/// Repository operations against the upstream service.
#[async_trait]
pub trait RepositoriesApi: Send + Sync {
    async fn get_repository(&self, organization: &str, name: &str)
        -> Result<RepositoryObject, ApiError>;
    async fn create_repository(&self, params: &RepositoryParams) -> Result<(), ApiError>;
    async fn update_repository(&self, params: &RepositoryParams) -> Result<(), ApiError>;
    async fn delete_repository(&self, organization: &str, name: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl RepositoriesApi for ApiClient {
    async fn get_repository(
        &self,
        organization: &str,
        name: &str,
    ) -> Result<RepositoryObject, ApiError> {
        self.get_json(&repo_path(organization, name)).await
    }

    async fn create_repository(&self, params: &RepositoryParams) -> Result<(), ApiError> {
        self.put_json(&repo_path(&params.organization, &params.name), &params.body())
            .await
    }

    async fn update_repository(&self, params: &RepositoryParams) -> Result<(), ApiError> {
        self.patch_json(&repo_path(&params.organization, &params.name), &params.body())
            .await
    }

    async fn delete_repository(&self, organization: &str, name: &str) -> Result<(), ApiError> {
        self.delete_path(&repo_path(organization, name)).await
    }
}
