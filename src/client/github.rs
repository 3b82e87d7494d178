//! GitHub API client implementation
//!
//! One client speaks both API surfaces: REST v3 for repository
//! administration and GraphQL for ProjectV2 boards. All calls share a
//! single rate limiter because GitHub's secondary limits count mutations
//! across both.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use super::api::{ProjectBoardApi, RepoAdminApi};
use super::{Label, RepoFile, RepoInfo};
use crate::error::{ApiError, Result};

/// GitHub API base URL
const API_BASE_URL: &str = "https://api.github.com";

/// Rate limit: GitHub's secondary limits throttle bursts of mutations
const RATE_LIMIT_PER_SECOND: u32 = 2;

/// GitHub rejects requests without a User-Agent
const USER_AGENT: &str = concat!("auditforge/", env!("CARGO_PKG_VERSION"));

/// GitHub API client
pub struct GitHubClient {
    http: HttpClient,
    base_url: String,
    token: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl GitHubClient {
    /// Create a new GitHub API client
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, API_BASE_URL.to_string())
    }

    /// Create a client against an alternate API host.
    ///
    /// Tests point this at a local mock server; GitHub Enterprise hosts
    /// work the same way.
    pub fn with_base_url(token: String, base_url: String) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(std::num::NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap());
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            rate_limiter,
        })
    }

    /// Make an authenticated REST request and parse the JSON response
    async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let response = self.send(method, path, body).await?;
        let data = response.json::<T>().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;
        Ok(data)
    }

    /// Make an authenticated REST request, discarding the response body
    async fn request_unit(&self, method: Method, path: &str, body: Option<Value>) -> Result<()> {
        self.send(method, path, body).await?;
        Ok(())
    }

    /// Send one REST request with auth headers and map error statuses
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Response> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, path);

        let mut request = self
            .http
            .request(method, &url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        check_status(response).await
    }

    /// Run a GraphQL query or mutation, returning the `data` object.
    ///
    /// GraphQL reports failures with HTTP 200 and an `errors` array, so
    /// both layers are checked here.
    async fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/graphql", self.base_url);
        debug!("POST /graphql");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("token {}", self.token))
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(ApiError::from)?;
        let response = check_status(response).await?;

        let envelope: Value = response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse GraphQL response: {}", e))
        })?;

        if let Some(errors) = envelope.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let message = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(ApiError::GraphQl(message).into());
            }
        }

        match envelope.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(ApiError::InvalidResponse("GraphQL response missing data".to_string()).into()),
        }
    }
}

/// Map an error status to the matching `ApiError`
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    match status {
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT => {
            Ok(response)
        }
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
        StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
        StatusCode::NOT_FOUND => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Resource not found".to_string());
            Err(ApiError::NotFound(error_msg).into())
        }
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Resource already exists".to_string());
            Err(ApiError::Conflict(error_msg).into())
        }
        StatusCode::BAD_REQUEST => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Bad request".to_string());
            Err(ApiError::BadRequest(error_msg).into())
        }
        status if status.is_server_error() => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| format!("Server error: {}", status));
            Err(ApiError::ServerError(error_msg).into())
        }
        _ => {
            let error_msg = format!("Unexpected status code: {}", status);
            Err(ApiError::InvalidResponse(error_msg).into())
        }
    }
}

#[async_trait]
impl RepoAdminApi for GitHubClient {
    async fn create_org_repo(&self, org: &str, name: &str, private: bool) -> Result<RepoInfo> {
        let body = json!({
            "name": name,
            "private": private,
            "has_projects": true,
        });
        self.request(Method::POST, &format!("/orgs/{}/repos", org), Some(body))
            .await
    }

    async fn delete_label(&self, org: &str, repo: &str, name: &str) -> Result<()> {
        // Default label names contain spaces; reqwest's URL parser
        // percent-encodes them in the path.
        self.request_unit(
            Method::DELETE,
            &format!("/repos/{}/{}/labels/{}", org, repo, name),
            None,
        )
        .await
    }

    async fn create_label(&self, org: &str, repo: &str, label: &Label) -> Result<()> {
        let body = json!({ "name": label.name, "color": label.color });
        self.request_unit(
            Method::POST,
            &format!("/repos/{}/{}/labels", org, repo),
            Some(body),
        )
        .await
    }

    async fn get_contents(&self, org: &str, repo: &str, path: &str) -> Result<Option<RepoFile>> {
        let result: Result<RepoFile> = self
            .request(
                Method::GET,
                &format!("/repos/{}/{}/contents/{}", org, repo, path),
                None,
            )
            .await;
        match result {
            Ok(file) => Ok(Some(file)),
            Err(crate::error::Error::Api(ApiError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_file(
        &self,
        org: &str,
        repo: &str,
        path: &str,
        message: &str,
        content: &[u8],
        branch: Option<&str>,
    ) -> Result<()> {
        let mut body = json!({
            "message": message,
            "content": general_purpose::STANDARD.encode(content),
        });
        if let Some(branch) = branch {
            body["branch"] = json!(branch);
        }
        self.request_unit(
            Method::PUT,
            &format!("/repos/{}/{}/contents/{}", org, repo, path),
            Some(body),
        )
        .await
    }

    async fn latest_commit_sha(&self, org: &str, repo: &str, branch: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Commit {
            sha: String,
        }

        let path = format!("/repos/{}/{}/commits?sha={}&per_page=1", org, repo, branch);
        let commits: Vec<Commit> = self.request(Method::GET, &path, None).await?;
        commits
            .into_iter()
            .next()
            .map(|c| c.sha)
            .ok_or_else(|| ApiError::InvalidResponse(format!("No commits on {}", branch)).into())
    }

    async fn create_branch(&self, org: &str, repo: &str, branch: &str, sha: &str) -> Result<()> {
        let body = json!({ "ref": format!("refs/heads/{}", branch), "sha": sha });
        self.request_unit(
            Method::POST,
            &format!("/repos/{}/{}/git/refs", org, repo),
            Some(body),
        )
        .await
    }

    async fn create_annotated_tag(
        &self,
        org: &str,
        repo: &str,
        tag: &str,
        message: &str,
        commit_sha: &str,
    ) -> Result<()> {
        #[derive(Deserialize)]
        struct TagObject {
            sha: String,
        }

        let body = json!({
            "tag": tag,
            "message": message,
            "object": commit_sha,
            "type": "commit",
        });
        let created: TagObject = self
            .request(
                Method::POST,
                &format!("/repos/{}/{}/git/tags", org, repo),
                Some(body),
            )
            .await?;

        let body = json!({ "ref": format!("refs/tags/{}", tag), "sha": created.sha });
        self.request_unit(
            Method::POST,
            &format!("/repos/{}/{}/git/refs", org, repo),
            Some(body),
        )
        .await
    }
}

#[async_trait]
impl ProjectBoardApi for GitHubClient {
    async fn org_node_id(&self, org: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Account {
            node_id: String,
        }

        // The users endpoint resolves organization logins too
        let account: Account = self
            .request(Method::GET, &format!("/users/{}", org), None)
            .await?;
        Ok(account.node_id)
    }

    async fn project_node_id(&self, org: &str, number: u64) -> Result<String> {
        const QUERY: &str = "query($login: String!, $number: Int!) { \
            organization(login: $login) { projectV2(number: $number) { id } } }";

        let data = self
            .graphql(QUERY, json!({ "login": org, "number": number }))
            .await?;
        data.pointer("/organization/projectV2/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::GraphQl(format!("Project {} not found in {}", number, org)).into()
            })
    }

    async fn copy_project(
        &self,
        owner_node_id: &str,
        project_node_id: &str,
        title: &str,
    ) -> Result<String> {
        const MUTATION: &str = "mutation($ownerId: ID!, $projectId: ID!, $title: String!) { \
            copyProjectV2(input: { ownerId: $ownerId, projectId: $projectId, title: $title }) \
            { projectV2 { id } } }";

        let data = self
            .graphql(
                MUTATION,
                json!({
                    "ownerId": owner_node_id,
                    "projectId": project_node_id,
                    "title": title,
                }),
            )
            .await?;
        data.pointer("/copyProjectV2/projectV2/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::GraphQl("copyProjectV2 returned no project id".to_string()).into()
            })
    }

    async fn update_project(
        &self,
        project_id: &str,
        public: bool,
        short_description: Option<&str>,
    ) -> Result<()> {
        const MUTATION: &str =
            "mutation($projectId: ID!, $public: Boolean!, $shortDescription: String) { \
            updateProjectV2(input: { projectId: $projectId, public: $public, \
            shortDescription: $shortDescription }) { projectV2 { id } } }";

        self.graphql(
            MUTATION,
            json!({
                "projectId": project_id,
                "public": public,
                "shortDescription": short_description,
            }),
        )
        .await?;
        Ok(())
    }

    async fn link_project(&self, project_id: &str, repo_node_id: &str) -> Result<()> {
        const MUTATION: &str = "mutation($projectId: ID!, $repositoryId: ID!) { \
            linkProjectV2ToRepository(input: { projectId: $projectId, \
            repositoryId: $repositoryId }) { repository { id } } }";

        self.graphql(
            MUTATION,
            json!({ "projectId": project_id, "repositoryId": repo_node_id }),
        )
        .await?;
        Ok(())
    }
}
