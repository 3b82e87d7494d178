//! Stripping GitHub Actions out of merged sources
//!
//! Merged repositories keep their code and history but must not keep
//! runnable workflows: a workflow from an audited project would otherwise
//! execute with the audit repository's permissions on the next push.

use std::path::{Path, PathBuf};

use log::{error, info};

use super::run::GitResult;
use crate::error::GitError;

/// Which directories count as CI configuration and get removed
#[derive(Debug, Clone)]
pub struct CiStripPolicy {
    /// Directory suffixes removed wherever they appear under a merge
    pub paths: Vec<String>,
}

impl Default for CiStripPolicy {
    fn default() -> Self {
        Self {
            paths: vec![
                ".github/workflows".to_string(),
                ".github/actions".to_string(),
                ".github/action".to_string(),
            ],
        }
    }
}

impl CiStripPolicy {
    /// Remove matching directories anywhere under `root`, returning what
    /// was removed. Individual removal failures are logged, not fatal.
    pub fn strip(&self, root: &Path) -> GitResult<Vec<PathBuf>> {
        let root_str = root
            .to_str()
            .ok_or_else(|| GitError::Workspace(format!("non-unicode path: {}", root.display())))?;
        let escaped = glob::Pattern::escape(root_str);

        let mut removed = Vec::new();
        for suffix in &self.paths {
            // The direct join covers a match at the top of the merge; the
            // recursive pattern covers vendored copies further down.
            let mut candidates: Vec<PathBuf> = vec![root.join(suffix)];
            let pattern = format!("{}/**/{}", escaped, suffix);
            let matches = glob::glob(&pattern)
                .map_err(|e| GitError::Workspace(format!("bad pattern {}: {}", pattern, e)))?;
            candidates.extend(matches.flatten());

            for path in candidates {
                if !path.is_dir() {
                    continue;
                }
                info!("Removing CI directory {}", path.display());
                match std::fs::remove_dir_all(&path) {
                    Ok(()) => removed.push(path),
                    Err(e) => error!("Error removing {}: {}", path.display(), e),
                }
            }
        }
        Ok(removed)
    }
}

/// Whether a directory tree contains at least one non-hidden file.
///
/// Hidden directories are not descended into, so a merge that produced
/// only `.git` bookkeeping or dotfiles counts as empty.
pub fn has_visible_files(root: &Path) -> bool {
    let Ok(entries) = std::fs::read_dir(root) else {
        return false;
    };
    for entry in entries.flatten() {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            return true;
        }
        if path.is_dir() && has_visible_files(&path) {
            return true;
        }
    }
    false
}
