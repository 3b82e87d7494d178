//! Rewriting submodule declarations after subtree merges
//!
//! A squashed subtree merge copies a source's `.gitmodules` verbatim into
//! its destination directory, where git ignores it. Every nested
//! declaration is rewritten relative to the repository root and collected
//! into a single root `.gitmodules` so `git submodule update --init
//! --recursive` resolves the audited project's dependencies.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::run::{GitResult, git, git_stdout};
use super::workspace::Workspace;
use crate::error::GitError;

type EntryMap = BTreeMap<String, BTreeMap<String, String>>;

/// Fold every `.gitmodules` in the workspace into the root one.
///
/// Nested declarations are namespaced by their subtree directory so two
/// sources can each vendor a submodule named `lib` without colliding.
/// Returns `false` when no declarations were found anywhere.
pub fn consolidate(ws: &Workspace, push_branch: &str) -> GitResult<bool> {
    let entries = collect(ws.root())?;
    if entries.is_empty() {
        info!("No submodule declarations found");
        return Ok(false);
    }

    info!("Consolidating {} submodule declaration(s)", entries.len());
    write_consolidated(ws.root(), &entries)?;

    let committed = ws.commit_all("Update .gitmodules with all submodules")?;
    if committed {
        if let Err(e) = ws.push("origin", push_branch) {
            warn!("Failed to push consolidated .gitmodules: {}", e);
        }
    }
    Ok(true)
}

/// Gather declarations from every `.gitmodules` under `root`, rewriting
/// nested ones relative to the root
fn collect(root: &Path) -> GitResult<EntryMap> {
    let mut merged: EntryMap = BTreeMap::new();
    for file in find_gitmodules(root)? {
        let Some(file_str) = file.to_str() else {
            warn!("Skipping non-unicode path {}", file.display());
            continue;
        };
        let listing = match git_stdout(root, ["config", "-f", file_str, "--list"]) {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Could not read {}: {}", file.display(), e);
                continue;
            }
        };

        let prefix = relative_prefix(root, &file);
        for (name, keys) in parse_listing(&listing) {
            if !keys.contains_key("path") {
                warn!("Skipping submodule {} with no path", name);
                continue;
            }
            let (name, keys) = rewrite_entry(&prefix, name, keys);
            merged.insert(name, keys);
        }
    }
    Ok(merged)
}

/// Parse `git config --list` output into per-submodule key/value maps.
///
/// Submodule names may themselves contain dots, so the key is taken from
/// the right.
fn parse_listing(listing: &str) -> EntryMap {
    let mut entries: EntryMap = BTreeMap::new();
    for line in listing.lines() {
        let Some((full_key, value)) = line.split_once('=') else {
            continue;
        };
        let Some(rest) = full_key.strip_prefix("submodule.") else {
            continue;
        };
        let Some((name, key)) = rest.rsplit_once('.') else {
            continue;
        };
        entries
            .entry(name.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }
    entries
}

fn rewrite_entry(
    prefix: &str,
    name: String,
    mut keys: BTreeMap<String, String>,
) -> (String, BTreeMap<String, String>) {
    if prefix.is_empty() {
        return (name, keys);
    }
    if let Some(path) = keys.get_mut("path") {
        *path = format!("{}/{}", prefix, path);
    }
    (format!("{}_{}", prefix.replace('/', "_"), name), keys)
}

/// Directory of `file` relative to `root`, forward slashes, empty for the
/// root `.gitmodules`
fn relative_prefix(root: &Path, file: &Path) -> String {
    let parent = file.parent().unwrap_or(root);
    let rel = parent.strip_prefix(root).unwrap_or(parent);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn find_gitmodules(root: &Path) -> GitResult<Vec<PathBuf>> {
    let root_str = root.to_str().ok_or_else(|| {
        GitError::Workspace(format!("non-unicode workspace path {}", root.display()))
    })?;
    let pattern = format!("{}/**/.gitmodules", glob::Pattern::escape(root_str));
    let matches = glob::glob(&pattern).map_err(|e| GitError::Workspace(e.to_string()))?;

    let mut files = vec![root.join(".gitmodules")];
    for entry in matches.filter_map(Result::ok) {
        if !files.contains(&entry) {
            files.push(entry);
        }
    }
    files.retain(|p| p.is_file());
    // Root first, then shallow to deep
    files.sort_by_key(|p| (p.components().count(), p.clone()));
    Ok(files)
}

/// Replace the root `.gitmodules` with the consolidated declarations
fn write_consolidated(root: &Path, entries: &EntryMap) -> GitResult<()> {
    let target = root.join(".gitmodules");
    if target.exists() {
        std::fs::remove_file(&target).map_err(|e| {
            GitError::Workspace(format!("could not replace .gitmodules: {}", e))
        })?;
    }
    let Some(target_str) = target.to_str() else {
        return Err(GitError::Workspace(format!(
            "non-unicode path {}",
            target.display()
        )));
    };

    for (name, keys) in entries {
        for (key, value) in keys {
            let config_key = format!("submodule.{}.{}", name, key);
            if let Err(e) = git(root, ["config", "-f", target_str, &config_key, value]) {
                warn!("Could not write {}: {}", config_key, e);
            }
        }
    }
    Ok(())
}
