//! Mock GitHub API client for testing
//!
//! Provides a mock implementation of the API traits for unit testing
//! without making real API calls.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::api::{ProjectBoardApi, RepoAdminApi};
use super::{Label, RepoFile, RepoInfo};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure state via builder methods, then assert on recorded calls.
///
/// # Example
/// ```ignore
/// let mock = MockGitHubClient::new()
///     .with_existing_labels(vec!["wontfix".into()])
///     .await;
///
/// mock.delete_label("acme", "repo", "wontfix").await?;
/// assert_eq!(mock.call_counts().await.delete_label, 1);
/// ```
pub struct MockGitHubClient {
    /// Repositories created through create_org_repo
    created_repos: Arc<Mutex<Vec<String>>>,
    /// Labels that exist on the mock repository
    labels: Arc<Mutex<Vec<String>>>,
    /// Labels created through create_label
    created_labels: Arc<Mutex<Vec<Label>>>,
    /// Files that exist on the mock repository
    files: Arc<Mutex<Vec<RepoFile>>>,
    /// Files committed through create_file
    created_files: Arc<Mutex<Vec<CreatedFile>>>,
    /// Branch refs that exist on the mock repository
    branches: Arc<Mutex<Vec<String>>>,
    /// Tags created through create_annotated_tag
    tags: Arc<Mutex<Vec<(String, String)>>>,
    /// Sha returned by latest_commit_sha
    head_sha: Arc<Mutex<String>>,
    /// Node id returned by org_node_id, None simulates an unknown login
    org_node: Arc<Mutex<Option<String>>>,
    /// Node id returned by project_node_id, None simulates a missing board
    project_node: Arc<Mutex<Option<String>>>,
    /// Boards linked to repositories
    linked_projects: Arc<Mutex<Vec<(String, String)>>>,
    /// Visibility updates applied to boards
    visibility_updates: Arc<Mutex<Vec<(String, bool)>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
}

/// A file committed through the mock contents API
#[derive(Debug, Clone)]
pub struct CreatedFile {
    pub path: String,
    pub message: String,
    pub branch: Option<String>,
}

impl Default for MockGitHubClient {
    fn default() -> Self {
        Self {
            created_repos: Arc::new(Mutex::new(Vec::new())),
            labels: Arc::new(Mutex::new(Vec::new())),
            created_labels: Arc::new(Mutex::new(Vec::new())),
            files: Arc::new(Mutex::new(Vec::new())),
            created_files: Arc::new(Mutex::new(Vec::new())),
            branches: Arc::new(Mutex::new(Vec::new())),
            tags: Arc::new(Mutex::new(Vec::new())),
            head_sha: Arc::new(Mutex::new("mock-head-sha".to_string())),
            org_node: Arc::new(Mutex::new(Some("O_mockorg".to_string()))),
            project_node: Arc::new(Mutex::new(Some("PVT_mocktemplate".to_string()))),
            linked_projects: Arc::new(Mutex::new(Vec::new())),
            visibility_updates: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(CallCounts::default())),
        }
    }
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub create_org_repo: usize,
    pub delete_label: usize,
    pub create_label: usize,
    pub get_contents: usize,
    pub create_file: usize,
    pub latest_commit_sha: usize,
    pub create_branch: usize,
    pub create_annotated_tag: usize,
    pub org_node_id: usize,
    pub project_node_id: usize,
    pub copy_project: usize,
    pub update_project: usize,
    pub link_project: usize,
}

impl MockGitHubClient {
    /// Create a new mock client with default (empty) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed labels that already exist on the repository.
    pub async fn with_existing_labels(self, names: Vec<String>) -> Self {
        *self.labels.lock().await = names;
        self
    }

    /// Seed files that already exist on the repository.
    pub async fn with_files(self, files: Vec<RepoFile>) -> Self {
        *self.files.lock().await = files;
        self
    }

    /// Seed branch refs that already exist on the repository.
    pub async fn with_branches(self, branches: Vec<String>) -> Self {
        *self.branches.lock().await = branches;
        self
    }

    /// Configure the sha returned by latest_commit_sha.
    pub async fn with_head_sha(self, sha: &str) -> Self {
        *self.head_sha.lock().await = sha.to_string();
        self
    }

    /// Simulate an organization login that cannot be resolved.
    pub async fn without_org_node(self) -> Self {
        *self.org_node.lock().await = None;
        self
    }

    /// Simulate a template board that cannot be resolved.
    pub async fn without_project_node(self) -> Self {
        *self.project_node.lock().await = None;
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Names of repositories created through the mock.
    pub async fn created_repos(&self) -> Vec<String> {
        self.created_repos.lock().await.clone()
    }

    /// Labels currently on the mock repository.
    pub async fn labels(&self) -> Vec<String> {
        self.labels.lock().await.clone()
    }

    /// Labels created through the mock.
    pub async fn created_labels(&self) -> Vec<Label> {
        self.created_labels.lock().await.clone()
    }

    /// Files committed through the mock.
    pub async fn created_files(&self) -> Vec<CreatedFile> {
        self.created_files.lock().await.clone()
    }

    /// Branch refs on the mock repository.
    pub async fn branches(&self) -> Vec<String> {
        self.branches.lock().await.clone()
    }

    /// Tags created through the mock, as (tag, commit sha) pairs.
    pub async fn tags(&self) -> Vec<(String, String)> {
        self.tags.lock().await.clone()
    }

    /// Boards linked through the mock, as (project id, repo node id) pairs.
    pub async fn linked_projects(&self) -> Vec<(String, String)> {
        self.linked_projects.lock().await.clone()
    }

    /// Visibility updates applied through the mock.
    pub async fn visibility_updates(&self) -> Vec<(String, bool)> {
        self.visibility_updates.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> Result<()> {
        let mut error = self.error.lock().await;
        if let Some(e) = error.take() {
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl RepoAdminApi for MockGitHubClient {
    async fn create_org_repo(&self, _org: &str, name: &str, _private: bool) -> Result<RepoInfo> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.create_org_repo += 1;
        drop(counts);

        self.created_repos.lock().await.push(name.to_string());
        Ok(RepoInfo {
            name: name.to_string(),
            node_id: format!("R_{}", name),
            html_url: Some(format!("https://github.com/mockorg/{}", name)),
            default_branch: Some("main".to_string()),
        })
    }

    async fn delete_label(&self, _org: &str, _repo: &str, name: &str) -> Result<()> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.delete_label += 1;
        drop(counts);

        let mut labels = self.labels.lock().await;
        match labels.iter().position(|l| l == name) {
            Some(index) => {
                labels.remove(index);
                Ok(())
            }
            None => Err(ApiError::NotFound(format!("label {}", name)).into()),
        }
    }

    async fn create_label(&self, _org: &str, _repo: &str, label: &Label) -> Result<()> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.create_label += 1;
        drop(counts);

        let mut labels = self.labels.lock().await;
        if labels.iter().any(|l| l == &label.name) {
            return Err(ApiError::Conflict(format!("label {}", label.name)).into());
        }
        labels.push(label.name.clone());
        self.created_labels.lock().await.push(label.clone());
        Ok(())
    }

    async fn get_contents(&self, _org: &str, _repo: &str, path: &str) -> Result<Option<RepoFile>> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.get_contents += 1;
        drop(counts);

        let files = self.files.lock().await;
        Ok(files.iter().find(|f| f.path == path).cloned())
    }

    async fn create_file(
        &self,
        _org: &str,
        _repo: &str,
        path: &str,
        message: &str,
        _content: &[u8],
        branch: Option<&str>,
    ) -> Result<()> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.create_file += 1;
        drop(counts);

        self.files.lock().await.push(RepoFile {
            path: path.to_string(),
            sha: "mock-blob-sha".to_string(),
        });
        self.created_files.lock().await.push(CreatedFile {
            path: path.to_string(),
            message: message.to_string(),
            branch: branch.map(str::to_string),
        });
        Ok(())
    }

    async fn latest_commit_sha(&self, _org: &str, _repo: &str, _branch: &str) -> Result<String> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.latest_commit_sha += 1;
        drop(counts);

        Ok(self.head_sha.lock().await.clone())
    }

    async fn create_branch(&self, _org: &str, _repo: &str, branch: &str, _sha: &str) -> Result<()> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.create_branch += 1;
        drop(counts);

        let mut branches = self.branches.lock().await;
        if branches.iter().any(|b| b == branch) {
            return Err(ApiError::Conflict(format!("branch {}", branch)).into());
        }
        branches.push(branch.to_string());
        Ok(())
    }

    async fn create_annotated_tag(
        &self,
        _org: &str,
        _repo: &str,
        tag: &str,
        _message: &str,
        commit_sha: &str,
    ) -> Result<()> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.create_annotated_tag += 1;
        drop(counts);

        self.tags
            .lock()
            .await
            .push((tag.to_string(), commit_sha.to_string()));
        Ok(())
    }
}

#[async_trait]
impl ProjectBoardApi for MockGitHubClient {
    async fn org_node_id(&self, org: &str) -> Result<String> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.org_node_id += 1;
        drop(counts);

        self.org_node
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::NotFound(format!("user {}", org)).into())
    }

    async fn project_node_id(&self, org: &str, number: u64) -> Result<String> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.project_node_id += 1;
        drop(counts);

        self.project_node
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::GraphQl(format!("Project {} not found in {}", number, org)).into())
    }

    async fn copy_project(
        &self,
        _owner_node_id: &str,
        _project_node_id: &str,
        title: &str,
    ) -> Result<String> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.copy_project += 1;
        drop(counts);

        Ok(format!("PVT_copy_{}", title.replace(' ', "_")))
    }

    async fn update_project(
        &self,
        project_id: &str,
        public: bool,
        _short_description: Option<&str>,
    ) -> Result<()> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.update_project += 1;
        drop(counts);

        self.visibility_updates
            .lock()
            .await
            .push((project_id.to_string(), public));
        Ok(())
    }

    async fn link_project(&self, project_id: &str, repo_node_id: &str) -> Result<()> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.link_project += 1;
        drop(counts);

        self.linked_projects
            .lock()
            .await
            .push((project_id.to_string(), repo_node_id.to_string()));
        Ok(())
    }
}
