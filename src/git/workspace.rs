//! Local working copy for assembling the audit repository

use std::path::{Path, PathBuf};

use super::run::{GitResult, git, git_ok, git_stdout};
use crate::error::GitError;

/// A scratch git checkout that the provisioner assembles and pushes.
///
/// The workspace wraps a directory and exposes exactly the git operations
/// the pipeline needs. It never reads global state and never touches
/// anything outside its root.
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Wrap a directory, creating it if needed
    pub fn create(root: impl Into<PathBuf>) -> GitResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| GitError::Workspace(format!("{}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Initialize an empty repository on the given branch.
    ///
    /// Older git versions ignore init.defaultBranch, so an unconditional
    /// checkout -b covers both; on an unborn HEAD it simply renames.
    pub fn init(&self, branch: &str) -> GitResult<()> {
        git(&self.root, ["init"])?;
        let _ = git(&self.root, ["checkout", "-b", branch]);
        Ok(())
    }

    /// Set the committer identity for this repository only
    pub fn set_identity(&self, name: &str, email: &str) -> GitResult<()> {
        git(&self.root, ["config", "user.name", name])?;
        git(&self.root, ["config", "user.email", email])?;
        Ok(())
    }

    pub fn add_remote(&self, name: &str, url: &str) -> GitResult<()> {
        git(&self.root, ["remote", "add", name, url])?;
        Ok(())
    }

    /// Drop a remote left behind by an earlier attempt, if present
    pub fn remove_remote(&self, name: &str) {
        let _ = git(&self.root, ["remote", "remove", name]);
    }

    pub fn fetch_tags(&self, remote: &str) -> GitResult<()> {
        git(&self.root, ["fetch", remote, "--tags"])?;
        Ok(())
    }

    /// Fetch one commit directly, for shas not reachable from any ref head
    pub fn fetch_commit(&self, remote: &str, commit: &str) -> GitResult<()> {
        git(&self.root, ["fetch", remote, commit])?;
        Ok(())
    }

    /// Whether an object is present locally
    pub fn has_commit(&self, commit: &str) -> bool {
        git_ok(&self.root, ["cat-file", "-t", commit])
    }

    /// Merge a remote commit under a prefix, squashing its history
    pub fn subtree_add(&self, prefix: &str, remote: &str, commit: &str) -> GitResult<()> {
        git(
            &self.root,
            ["subtree", "add", "--prefix", prefix, "--squash", remote, commit],
        )?;
        Ok(())
    }

    /// Whether `git subtree` is available on this machine.
    ///
    /// The subcommand ships with git's contrib tools and is missing from
    /// some minimal installs.
    pub fn subtree_available(&self) -> bool {
        git_ok(&self.root, ["subtree", "-h"])
    }

    /// Stage everything and commit. Returns false when the tree is clean.
    pub fn commit_all(&self, message: &str) -> GitResult<bool> {
        git(&self.root, ["add", "."])?;
        if git_stdout(&self.root, ["status", "--porcelain"])?.is_empty() {
            return Ok(false);
        }
        git(&self.root, ["commit", "-m", message])?;
        Ok(true)
    }

    pub fn push(&self, remote: &str, branch: &str) -> GitResult<()> {
        git(&self.root, ["push", remote, branch])?;
        Ok(())
    }

    pub fn push_upstream(&self, remote: &str, branch: &str) -> GitResult<()> {
        git(&self.root, ["push", "-u", remote, branch])?;
        Ok(())
    }

    /// Force push, used where the assembled state must win over the remote
    pub fn force_push(&self, remote: &str, branch: &str) -> GitResult<()> {
        git(&self.root, ["push", "--force", remote, branch])?;
        Ok(())
    }

    pub fn checkout(&self, branch: &str) -> GitResult<()> {
        git(&self.root, ["checkout", branch])?;
        Ok(())
    }

    pub fn checkout_new(&self, branch: &str) -> GitResult<()> {
        git(&self.root, ["checkout", "-b", branch])?;
        Ok(())
    }

    pub fn current_branch(&self) -> GitResult<String> {
        git_stdout(&self.root, ["branch", "--show-current"])
    }

    pub fn has_local_branch(&self, branch: &str) -> GitResult<bool> {
        let listing = git_stdout(&self.root, ["branch", "--list", branch])?;
        Ok(!listing.is_empty())
    }
}
