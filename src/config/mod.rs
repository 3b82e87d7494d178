//! Job-file loading and validation
//!
//! A job file describes one provisioning run: the target repository name,
//! the auditors, and the source repositories to merge. Both JSON and YAML
//! files are accepted, with the format chosen by file extension.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// A provisioning job as written on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    /// Name of the audit repository to create in the organization
    #[serde(default, alias = "target_repo_name")]
    pub target_repo_name: Option<String>,

    /// Title for the copied project board
    #[serde(default, alias = "project_title")]
    pub project_title: Option<String>,

    /// Whitespace-separated list of auditor handles
    #[serde(default)]
    pub auditors: Option<String>,

    /// Source repositories to merge into the audit repository
    #[serde(default)]
    pub repositories: Vec<SourceEntry>,
}

/// One source repository in the job file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    /// HTTPS URL of the repository to merge
    #[serde(default, alias = "source_url")]
    pub source_url: Option<String>,

    /// Commit the audit covers
    #[serde(default, alias = "commit_hash")]
    pub commit_hash: Option<String>,

    /// Destination subdirectory, defaulting to the repository name
    #[serde(default, alias = "sub_folder")]
    pub sub_folder: Option<String>,
}

/// A job that passed validation and is ready to run
#[derive(Debug, Clone)]
pub struct ProvisionJob {
    pub target_repo_name: String,
    pub project_title: Option<String>,
    pub auditors: Vec<String>,
    pub sources: Vec<SourceSpec>,
    /// Entries dropped during validation for missing fields
    pub skipped: usize,
}

/// A validated source repository
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub url: String,
    pub commit: String,
    pub sub_folder: Option<String>,
}

impl JobConfig {
    /// Load a job file from a specific path
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        Self::parse(&contents, yaml)
    }

    /// Parse job file contents, JSON by default and YAML when requested
    pub fn parse(contents: &str, yaml: bool) -> Result<Self> {
        let config: JobConfig = if yaml {
            serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        };
        Ok(config)
    }

    /// Validate the job and produce a runnable description.
    ///
    /// Missing required fields are usage errors. Incomplete source entries
    /// are skipped with a warning rather than failing the whole job.
    pub fn validate(&self) -> Result<ProvisionJob> {
        let target_repo_name = match self.target_repo_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(
                    ConfigError::Invalid("targetRepoName must be provided".to_string()).into(),
                );
            }
        };

        let auditors: Vec<String> = self
            .auditors
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if auditors.is_empty() {
            return Err(ConfigError::Invalid(
                "auditors must list at least one GitHub handle".to_string(),
            )
            .into());
        }

        if self.repositories.is_empty() {
            return Err(ConfigError::Invalid(
                "repositories must list at least one source repository".to_string(),
            )
            .into());
        }

        let mut sources = Vec::new();
        let mut skipped = 0;
        for (index, entry) in self.repositories.iter().enumerate() {
            match entry.resolve() {
                Some(spec) => sources.push(spec),
                None => {
                    warn!(
                        "Skipping repositories[{index}]: sourceUrl and commitHash are both required"
                    );
                    skipped += 1;
                }
            }
        }

        let project_title = self
            .project_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(ProvisionJob {
            target_repo_name,
            project_title,
            auditors,
            sources,
            skipped,
        })
    }
}

impl SourceEntry {
    fn resolve(&self) -> Option<SourceSpec> {
        let url = self.source_url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        let commit = self.commit_hash.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
        let sub_folder = self
            .sub_folder
            .as_deref()
            .map(|s| s.trim().trim_matches('/'))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Some(SourceSpec {
            url: url.to_string(),
            commit: commit.to_string(),
            sub_folder,
        })
    }
}
