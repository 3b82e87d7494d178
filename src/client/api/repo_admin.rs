//! Repository administration API trait

use async_trait::async_trait;

use crate::client::{Label, RepoFile, RepoInfo};
use crate::error::Result;

/// Repository creation and administration operations for the GitHub API
///
/// This trait covers everything the provisioner does through the REST API:
/// creating the audit repository, managing labels, committing files, and
/// creating branches and tags.
#[async_trait]
pub trait RepoAdminApi: Send + Sync {
    // ========================================================================
    // Repositories
    // ========================================================================

    /// Create a repository in an organization
    async fn create_org_repo(&self, org: &str, name: &str, private: bool) -> Result<RepoInfo>;

    // ========================================================================
    // Labels
    // ========================================================================

    /// Delete a label from a repository.
    ///
    /// Returns `ApiError::NotFound` if the label does not exist, which
    /// callers replacing the default taxonomy treat as already done.
    async fn delete_label(&self, org: &str, repo: &str, name: &str) -> Result<()>;

    /// Create a label in a repository.
    ///
    /// Returns `ApiError::Conflict` if a label with the same name already
    /// exists.
    async fn create_label(&self, org: &str, repo: &str, label: &Label) -> Result<()>;

    // ========================================================================
    // Contents
    // ========================================================================

    /// Fetch file metadata from the default branch, or `None` when the path
    /// does not exist
    async fn get_contents(&self, org: &str, repo: &str, path: &str) -> Result<Option<RepoFile>>;

    /// Commit a new file through the contents API
    async fn create_file(
        &self,
        org: &str,
        repo: &str,
        path: &str,
        message: &str,
        content: &[u8],
        branch: Option<&str>,
    ) -> Result<()>;

    // ========================================================================
    // Commits, branches & tags
    // ========================================================================

    /// Resolve the most recent commit on a branch
    async fn latest_commit_sha(&self, org: &str, repo: &str, branch: &str) -> Result<String>;

    /// Create a branch pointing at a commit.
    ///
    /// Returns `ApiError::Conflict` if the ref already exists.
    async fn create_branch(&self, org: &str, repo: &str, branch: &str, sha: &str) -> Result<()>;

    /// Create an annotated tag object and its ref in one go
    async fn create_annotated_tag(
        &self,
        org: &str,
        repo: &str,
        tag: &str,
        message: &str,
        commit_sha: &str,
    ) -> Result<()>;
}
