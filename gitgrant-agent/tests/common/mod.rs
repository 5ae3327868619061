//! Fake upstream code-hosting service for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use gitgrant_agent::client::{PermissionGrant, RepositoryObject};
use gitgrant_api::PermissionLevel;

pub const TOKEN: &str = "sekrit";

type GrantKey = (String, String, String);
type RepoKey = (String, String);

#[derive(Clone, Default)]
pub struct Upstream {
    pub grants: Arc<Mutex<HashMap<GrantKey, PermissionLevel>>>,
    pub repos: Arc<Mutex<HashMap<RepoKey, RepositoryObject>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

#[derive(Deserialize)]
struct GrantBody {
    permission: PermissionLevel,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoBody {
    private: bool,
    #[serde(default)]
    description: Option<String>,
}

async fn get_grant(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Path((org, team, repo)): Path<(String, String, String)>,
) -> Result<Json<PermissionGrant>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::FORBIDDEN);
    }
    let grants = up.grants.lock().unwrap();
    grants
        .get(&(org.clone(), team.clone(), repo.clone()))
        .map(|permission| {
            Json(PermissionGrant {
                organization: org.clone(),
                team: team.clone(),
                repository: repo.clone(),
                permission: *permission,
            })
        })
        .ok_or(StatusCode::NOT_FOUND)
}

async fn put_grant(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Path((org, team, repo)): Path<(String, String, String)>,
    Json(body): Json<GrantBody>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN;
    }
    up.grants
        .lock()
        .unwrap()
        .insert((org, team, repo), body.permission);
    StatusCode::CREATED
}

async fn delete_grant(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Path((org, team, repo)): Path<(String, String, String)>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN;
    }
    match up.grants.lock().unwrap().remove(&(org, team, repo)) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn get_repo(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Path((org, name)): Path<(String, String)>,
) -> Result<Json<RepositoryObject>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::FORBIDDEN);
    }
    up.repos
        .lock()
        .unwrap()
        .get(&(org, name))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn put_repo(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Path((org, name)): Path<(String, String)>,
    Json(body): Json<RepoBody>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN;
    }
    up.repos.lock().unwrap().insert(
        (org.clone(), name.clone()),
        RepositoryObject {
            organization: org,
            name,
            private: body.private,
            description: body.description,
        },
    );
    StatusCode::CREATED
}

async fn patch_repo(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Path((org, name)): Path<(String, String)>,
    Json(body): Json<RepoBody>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN;
    }
    match up.repos.lock().unwrap().get_mut(&(org, name)) {
        Some(repo) => {
            repo.private = body.private;
            repo.description = body.description;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_repo(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Path((org, name)): Path<(String, String)>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN;
    }
    match up.repos.lock().unwrap().remove(&(org, name)) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

/// Start the fake service on a free port and return its base URL.
pub async fn spawn(up: Upstream) -> String {
    let app = Router::new()
        .route(
            "/v1/orgs/{org}/teams/{team}/repos/{repo}/permission",
            get(get_grant).put(put_grant).delete(delete_grant),
        )
        .route(
            "/v1/orgs/{org}/repos/{name}",
            get(get_repo).put(put_repo).patch(patch_repo).delete(delete_repo),
        )
        .with_state(up);

    let port = portpicker::pick_unused_port().expect("no free port");
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .expect("bind fake upstream");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake upstream");
    });
    format!("http://127.0.0.1:{port}")
}
