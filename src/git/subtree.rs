//! Merging source repositories as squashed subtrees

use log::{info, warn};

use super::actions::{CiStripPolicy, has_visible_files};
use super::run::{GitResult, git_global};
use super::workspace::Workspace;
use crate::config::SourceSpec;
use crate::error::GitError;

/// Remotes for merged sources share this prefix so stale ones from an
/// interrupted run are recognizable
pub const REMOTE_PREFIX: &str = "subtree_source_";

/// Normalize a repository URL for merging.
///
/// Drops a trailing `.git`, trailing slashes, and a `/tree/<branch>`
/// suffix left over from copying a URL out of the GitHub UI.
pub fn normalize_url(url: &str) -> String {
    let mut url = url.trim().trim_end_matches('/');
    if let Some(stripped) = url.strip_suffix(".git") {
        url = stripped;
    }
    strip_tree_suffix(url).trim_end_matches('/').to_string()
}

fn strip_tree_suffix(url: &str) -> &str {
    if let Some(idx) = url.rfind("/tree/") {
        let branch = &url[idx + "/tree/".len()..];
        if !branch.is_empty() && !branch.contains('/') {
            return &url[..idx];
        }
    }
    url
}

/// Repository name: the last path segment of the normalized URL
pub fn repo_name(url: &str) -> String {
    normalize_url(url)
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Embed a token in an https URL for authenticated fetches.
///
/// Non-https URLs (local paths in tests, ssh remotes) pass through
/// unchanged.
pub fn authenticate_url(url: &str, token: &str) -> String {
    if token.is_empty() {
        return url.to_string();
    }
    match url.strip_prefix("https://") {
        Some(rest) => format!("https://{}@{}", token, rest),
        None => url.to_string(),
    }
}

/// Check that a remote answers before mutating anything locally
pub fn probe_remote(fetch_url: &str, display_url: &str) -> GitResult<()> {
    match git_global(["ls-remote", fetch_url]) {
        Ok(_) => Ok(()),
        Err(GitError::Command { stderr, .. }) => {
            Err(GitError::Unreachable(display_url.to_string(), stderr))
        }
        Err(e) => Err(e),
    }
}

/// Whether a remote repository exists and has branch heads
pub fn remote_exists(fetch_url: &str) -> bool {
    git_global(["ls-remote", "-h", fetch_url]).is_ok()
}

fn short(commit: &str) -> &str {
    commit.get(..8).unwrap_or(commit)
}

/// Outcome of one merged source
#[derive(Debug, Clone)]
pub struct MergedSource {
    /// Repository name derived from the URL
    pub name: String,
    /// Destination directory relative to the workspace root
    pub dest: String,
    /// The pinned commit that was merged
    pub commit: String,
}

/// Merges pinned source commits into the workspace one at a time
pub struct SubtreeMerger<'a> {
    workspace: &'a Workspace,
    token: &'a str,
    strip_policy: &'a CiStripPolicy,
}

impl<'a> SubtreeMerger<'a> {
    pub fn new(workspace: &'a Workspace, token: &'a str, strip_policy: &'a CiStripPolicy) -> Self {
        Self {
            workspace,
            token,
            strip_policy,
        }
    }

    /// Merge one source at its pinned commit onto the current branch.
    ///
    /// The sequence mirrors a by-hand subtree merge: probe the remote,
    /// fetch it under a stable remote name, make sure the commit object
    /// is present, squash-merge it under the destination prefix, strip CI
    /// directories, then commit and push. A push failure is reported but
    /// does not fail the merge; everything else does.
    pub fn merge(&self, source: &SourceSpec, push_branch: &str) -> GitResult<MergedSource> {
        let clean_url = normalize_url(&source.url);
        let name = repo_name(&source.url);
        if name.is_empty() {
            return Err(GitError::Workspace(format!(
                "cannot derive a repository name from {}",
                source.url
            )));
        }
        let dest = source.sub_folder.clone().unwrap_or_else(|| name.clone());
        let fetch_url = authenticate_url(&clean_url, self.token);

        info!(
            "Merging {} at {} into {}/",
            clean_url,
            short(&source.commit),
            dest
        );

        // A leftover directory would shadow the merge
        let dest_path = self.workspace.root().join(&dest);
        if dest_path.exists() {
            info!("Removing existing directory {}", dest);
            std::fs::remove_dir_all(&dest_path).map_err(|e| GitError::RemoveDir {
                path: dest.clone(),
                reason: e.to_string(),
            })?;
        }

        probe_remote(&fetch_url, &clean_url)?;

        let remote = format!("{}{}", REMOTE_PREFIX, name);
        self.workspace.remove_remote(&remote);
        self.workspace.add_remote(&remote, &fetch_url)?;
        self.workspace.fetch_tags(&remote)?;

        if !self.workspace.has_commit(&source.commit) {
            info!("Fetching commit {} directly", short(&source.commit));
            if let Err(e) = self.workspace.fetch_commit(&remote, &source.commit) {
                warn!("Direct fetch of {} failed: {}", short(&source.commit), e);
            }
        }

        self.workspace.subtree_add(&dest, &remote, &source.commit)?;

        if !has_visible_files(&dest_path) {
            return Err(GitError::EmptyMerge(dest));
        }

        self.strip_policy.strip(&dest_path)?;

        let message = format!("Add {} at commit {}", name, short(&source.commit));
        self.workspace.commit_all(&message)?;

        if let Err(e) = self.workspace.push("origin", push_branch) {
            warn!("Failed to push {}: {}", push_branch, e);
            info!("Continuing anyway");
        }

        Ok(MergedSource {
            name,
            dest,
            commit: source.commit.clone(),
        })
    }
}
