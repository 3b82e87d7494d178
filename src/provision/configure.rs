//! Labels, issue template, and working branches for the audit repository

use log::{info, warn};

use super::{MAIN_BRANCH, REPORT_BRANCH};
use crate::client::Label;
use crate::client::api::RepoAdminApi;
use crate::error::{ApiError, Error, Result};

/// GitHub's stock labels, retired from every audit repository
const RETIRED_LABELS: [&str; 9] = [
    "bug",
    "duplicate",
    "enhancement",
    "invalid",
    "question",
    "wontfix",
    "good first issue",
    "help wanted",
    "documentation",
];

const SEVERITY_LABELS: [(&str, &str); 10] = [
    ("Severity: Critical Risk", "ff0000"),
    ("Severity: High Risk", "B60205"),
    ("Severity: Medium Risk", "D93F0B"),
    ("Severity: Low Risk", "FBCA04"),
    ("Severity: Informational", "1D76DB"),
    ("Severity: Gas Optimization", "B4E197"),
    ("Report Status: Open", "5319E7"),
    ("Report Status: Acknowledged", "BFA8DC"),
    ("Report Status: Resolved", "0E8A16"),
    ("Report Status: Closed", "bfdadc"),
];

/// Issue template auditors file findings against
const FINDING_TEMPLATE: &str = "---
name: Finding
about: Description of the finding
title: ''
labels: ''
assignees: ''
---

**Description:**

**Impact:**

**Proof of Concept:**

**Recommended Mitigation:**

**[Project]:**

**Cyfrin:**";

const FINDING_TEMPLATE_PATH: &str = ".github/ISSUE_TEMPLATE/finding.md";

/// The label set an audit repository starts with
pub struct LabelTaxonomy {
    /// Default labels to remove
    pub retired: Vec<String>,
    /// Severity and report status labels to create
    pub labels: Vec<Label>,
}

impl Default for LabelTaxonomy {
    fn default() -> Self {
        Self {
            retired: RETIRED_LABELS.iter().map(|name| name.to_string()).collect(),
            labels: SEVERITY_LABELS
                .iter()
                .map(|(name, color)| Label::new(name, color))
                .collect(),
        }
    }
}

/// Swap GitHub's default labels for the audit taxonomy.
///
/// Each label is handled independently and failures only warn: a
/// half-labelled repository is still usable, and labels are trivial to
/// fix by hand afterwards.
pub async fn replace_labels(
    client: &impl RepoAdminApi,
    org: &str,
    repo: &str,
    taxonomy: &LabelTaxonomy,
) {
    info!("Deleting default labels...");
    for name in &taxonomy.retired {
        if let Err(e) = client.delete_label(org, repo, name).await {
            warn!("Label {} not deleted: {}", name, e);
        }
    }

    info!("Creating new labels...");
    for label in &taxonomy.labels {
        if let Err(e) = client.create_label(org, repo, label).await {
            warn!("Label {} not created: {}", label.name, e);
        }
    }
}

/// Commit the finding issue template unless the repository already has one
pub async fn add_issue_template(client: &impl RepoAdminApi, org: &str, repo: &str) -> Result<()> {
    if client
        .get_contents(org, repo, FINDING_TEMPLATE_PATH)
        .await?
        .is_some()
    {
        info!("Issue template already present, leaving it alone");
        return Ok(());
    }

    client
        .create_file(
            org,
            repo,
            FINDING_TEMPLATE_PATH,
            "finding.md",
            FINDING_TEMPLATE.as_bytes(),
            None,
        )
        .await
}

/// Create one working branch per auditor at the given commit
pub async fn create_auditor_branches(
    client: &impl RepoAdminApi,
    org: &str,
    repo: &str,
    auditors: &[String],
    sha: &str,
) -> Result<()> {
    for auditor in auditors {
        let branch = format!("audit/{}", auditor);
        create_branch_tolerating_existing(client, org, repo, &branch, sha).await?;
    }
    Ok(())
}

/// Create the branch the report toolchain will be installed on
pub async fn create_report_branch(
    client: &impl RepoAdminApi,
    org: &str,
    repo: &str,
    sha: &str,
) -> Result<()> {
    create_branch_tolerating_existing(client, org, repo, REPORT_BRANCH, sha).await
}

/// An existing branch is fine; anything else aborts the run since the
/// team cannot work without its branches
async fn create_branch_tolerating_existing(
    client: &impl RepoAdminApi,
    org: &str,
    repo: &str,
    branch: &str,
    sha: &str,
) -> Result<()> {
    match client.create_branch(org, repo, branch, sha).await {
        Ok(()) => {
            info!("Created branch {}", branch);
            Ok(())
        }
        Err(Error::Api(ApiError::Conflict(_))) => {
            warn!("Branch {} already exists. Skipping...", branch);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Tag the current head of the integration branch for a merged source
pub async fn tag_source_merge(
    client: &impl RepoAdminApi,
    org: &str,
    repo: &str,
    source_name: &str,
) -> Result<()> {
    let sha = client.latest_commit_sha(org, repo, MAIN_BRANCH).await?;
    let tag = format!("{}-cyfrin-audit", source_name);
    let message = format!("Cyfrin audit tag for {}", source_name);
    client
        .create_annotated_tag(org, repo, &tag, &message, &sha)
        .await
}
