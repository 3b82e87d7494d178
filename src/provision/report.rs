//! Installing the report-generator toolchain on the report branch

use std::path::Path;

use log::{info, warn};

use super::{MAIN_BRANCH, REPORT_BRANCH};
use crate::config::SourceSpec;
use crate::error::GitError;
use crate::git::actions::has_visible_files;
use crate::git::subtree::{REMOTE_PREFIX, authenticate_url, probe_remote};
use crate::git::{GitResult, Workspace};

/// Where the report toolchain comes from and where it lands
pub struct ReportTemplate {
    pub url: String,
    pub name: String,
    pub path_prefix: String,
    /// Ref of the template repository to merge
    pub branch: String,
}

impl Default for ReportTemplate {
    fn default() -> Self {
        Self {
            url: "https://github.com/Cyfrin/report-generator-template.git".to_string(),
            name: "report-generator-template".to_string(),
            path_prefix: "cyfrin-report".to_string(),
            branch: MAIN_BRANCH.to_string(),
        }
    }
}

impl ReportTemplate {
    /// Directory the template is merged under
    pub fn subtree_path(&self) -> String {
        format!("{}/{}", self.path_prefix, self.name)
    }
}

/// Install the report toolchain as a subtree on the report branch.
///
/// The caller treats a failure here as a degraded run, not a fatal one:
/// the audit repository is complete without report tooling.
pub fn scaffold_report_branch(
    ws: &Workspace,
    token: &str,
    template: &ReportTemplate,
    sources: &[SourceSpec],
    org: &str,
    target: &str,
) -> GitResult<()> {
    info!("Adding subtree {}", template.name);

    if ws.has_local_branch(REPORT_BRANCH)? {
        info!("Using existing {} branch", REPORT_BRANCH);
        ws.checkout(REPORT_BRANCH)?;
    } else {
        info!("Creating {} branch", REPORT_BRANCH);
        ws.checkout(MAIN_BRANCH)?;
        ws.checkout_new(REPORT_BRANCH)?;
    }

    let fetch_url = authenticate_url(&template.url, token);
    probe_remote(&fetch_url, &template.url)?;

    let remote = format!("{}{}", REMOTE_PREFIX, template.name);
    ws.remove_remote(&remote);
    ws.add_remote(&remote, &fetch_url)?;
    ws.fetch_tags(&remote)?;

    let subtree_path = template.subtree_path();
    ws.subtree_add(&subtree_path, &remote, &template.branch)?;

    if !has_visible_files(&ws.root().join(&subtree_path)) {
        return Err(GitError::EmptyMerge(subtree_path));
    }

    relocate_workflow(ws.root(), &subtree_path);
    patch_summary(ws.root(), &subtree_path, sources, org, target);

    if let Err(e) = ws.commit_all(&format!("install: {}", template.name)) {
        warn!("Error committing report toolchain: {}", e);
    }
    // Force push so a stale report branch never shadows this install
    if let Err(e) = ws.force_push("origin", REPORT_BRANCH) {
        warn!("Error force pushing changes: {}", e);
        warn!("You may need to push changes manually.");
    } else {
        info!(
            "The subtree {} has been added on branch {}",
            template.name, REPORT_BRANCH
        );
    }
    Ok(())
}

/// The template ships its driver workflow inside the subtree; GitHub only
/// runs workflows from the repository root
fn relocate_workflow(root: &Path, subtree_path: &str) {
    let source = root.join(subtree_path).join(".github/workflows/main.yml");
    let destination = root.join(".github/workflows/main.yml");

    if !source.exists() {
        warn!("Workflow file not found at {}", source.display());
        return;
    }
    if let Err(e) = std::fs::create_dir_all(root.join(".github/workflows")) {
        warn!("Error moving workflow file: {}", e);
        return;
    }
    if let Err(e) = std::fs::rename(&source, &destination) {
        warn!("Error moving workflow file: {}", e);
    }
}

fn patch_summary(root: &Path, subtree_path: &str, sources: &[SourceSpec], org: &str, target: &str) {
    let summary_path = root.join(subtree_path).join("source/summary_information.conf");
    let contents = match std::fs::read_to_string(&summary_path) {
        Ok(contents) => contents,
        Err(_) => {
            warn!(
                "Summary information file not found at {}",
                summary_path.display()
            );
            return;
        }
    };

    let patched = patch_summary_contents(&contents, sources, org, target);
    if let Err(e) = std::fs::write(&summary_path, patched) {
        warn!("Could not update {}: {}", summary_path.display(), e);
    }
}

/// Rewrite the template's `key = value` assignments with the audited
/// sources and the private repository URL.
///
/// The template has slots for three source repositories: `project_github`
/// and `commit_hash`, then the same with `_2` and `_3` suffixes.
fn patch_summary_contents(
    contents: &str,
    sources: &[SourceSpec],
    org: &str,
    target: &str,
) -> String {
    let mut replacements: Vec<(String, String)> = Vec::new();
    for (i, source) in sources.iter().take(3).enumerate() {
        let suffix = if i == 0 {
            String::new()
        } else {
            format!("_{}", i + 1)
        };
        replacements.push((format!("project_github{}", suffix), source.url.clone()));
        replacements.push((format!("commit_hash{}", suffix), source.commit.clone()));
    }
    replacements.push((
        "private_github".to_string(),
        format!("https://github.com/{}/{}.git", org, target),
    ));

    let mut patched = contents
        .lines()
        .map(|line| {
            for (key, value) in &replacements {
                if line_matches_key(line, key) {
                    return format!("{} = {}", key, value);
                }
            }
            line.to_string()
        })
        .collect::<Vec<_>>()
        .join("\n");
    if contents.ends_with('\n') {
        patched.push('\n');
    }
    patched
}

/// Match `key = ...` with optional whitespace, anchored at line start.
///
/// `project_github` must not swallow `project_github_2`, so the character
/// right after the key has to start the assignment.
fn line_matches_key(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .map(|rest| rest.trim_start().starts_with('='))
        .unwrap_or(false)
}
