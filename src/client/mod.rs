//! GitHub API client

use serde::{Deserialize, Serialize};

pub mod api;
pub mod github;
#[cfg(test)]
pub mod mock;

pub use api::{ProjectBoardApi, RepoAdminApi};
pub use github::GitHubClient;

/// Combined GitHub API surface
///
/// Blanket-implemented for anything that provides both sub-traits, so the
/// provisioning pipeline can hold one object for REST and GraphQL work.
pub trait GitHubApi: RepoAdminApi + ProjectBoardApi {}

impl<T: RepoAdminApi + ProjectBoardApi> GitHubApi for T {}

/// Repository resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoInfo {
    /// Repository name
    pub name: String,

    /// Global node id, needed to link project boards
    pub node_id: String,

    /// Browser URL (optional, not in all responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,

    /// Default branch name (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

/// An issue label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name
    pub name: String,

    /// Six-digit hex color, without the leading `#`
    pub color: String,
}

impl Label {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// A file tracked in a repository, as returned by the contents API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoFile {
    /// Path relative to the repository root
    pub path: String,

    /// Blob sha
    pub sha: String,
}
