//! ProjectV2 board API trait

use async_trait::async_trait;

use crate::error::Result;

/// Project board operations for the GitHub GraphQL API
///
/// ProjectV2 boards are only reachable over GraphQL, except for the owner
/// node id which comes from a REST lookup. Every method returns opaque node
/// ids that feed the next call in the chain.
#[async_trait]
pub trait ProjectBoardApi: Send + Sync {
    /// Resolve an organization login to its global node id
    async fn org_node_id(&self, org: &str) -> Result<String>;

    /// Resolve a project board number within an organization to its node id.
    ///
    /// The number is the one visible in the board URL, e.g. `7` in
    /// `https://github.com/orgs/Cyfrin/projects/7/views/2`.
    async fn project_node_id(&self, org: &str, number: u64) -> Result<String>;

    /// Copy a template project board, returning the new board's node id
    async fn copy_project(
        &self,
        owner_node_id: &str,
        project_node_id: &str,
        title: &str,
    ) -> Result<String>;

    /// Update a board's visibility and description
    async fn update_project(
        &self,
        project_id: &str,
        public: bool,
        short_description: Option<&str>,
    ) -> Result<()>;

    /// Link a board to a repository so it shows up in the repo's Projects tab
    async fn link_project(&self, project_id: &str, repo_node_id: &str) -> Result<()>;
}
