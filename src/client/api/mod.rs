//! API trait definitions split by responsibility
//!
//! This module organizes the GitHub API surface into focused sub-traits:
//! - [`RepoAdminApi`] - Repository creation and per-repository administration
//! - [`ProjectBoardApi`] - ProjectV2 board operations over GraphQL
//!
//! The [`GitHubApi`](super::GitHubApi) super-trait combines both.

mod board;
mod repo_admin;

pub use board::ProjectBoardApi;
pub use repo_admin::RepoAdminApi;
