//! Typed client for the code-hosting service API.
//!
//! One module per remote surface, thin typed methods over a shared HTTP
//! client. Errors are classified once, at the transport boundary: HTTP 404
//! becomes `ApiError::NotFound`, every other non-success status becomes
//! `ApiError::Api`, and connection-level failures surface as
//! `ApiError::Transport`.

pub mod permissions;
pub mod repositories;

pub use permissions::{CreatePermission, PermissionGrant, PermissionKey, PermissionsApi};
pub use repositories::{RepositoriesApi, RepositoryObject, RepositoryParams};

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the upstream API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No object matches the structural key.
    #[error("not found")]
    NotFound,

    /// The service answered with a non-success status.
    #[error("api error: status {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connect, TLS, timeout).
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

/// Maps a non-success HTTP status to an `ApiError`.
fn classify(status: StatusCode, message: String) -> ApiError {
    if status == StatusCode::NOT_FOUND {
        ApiError::NotFound
    } else {
        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Requests abort at this deadline even if the engine's own cycle deadline
/// is longer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one resolved provider config. Built fresh on every
/// connect; never cached across cycles.
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl ApiClient {
    pub fn new(endpoint: &str, token: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("gitgrant-agent/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        Ok(resp.json().await?)
    }

    async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let resp = self
            .http
            .put(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        Ok(())
    }

    async fn patch_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let resp = self
            .http
            .patch(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        Ok(())
    }

    async fn delete_path(&self, path: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        Ok(())
    }

    async fn error_from(resp: reqwest::Response) -> ApiError {
        let status = resp.status();
        let message = resp.text().await.unwrap_or_default();
        classify(status, message)
    }
}
