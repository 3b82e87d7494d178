//! The create command: provision an audit repository end to end
//!
//! Orchestrates the whole run: create the private repository, merge every
//! pinned source as a squashed subtree, consolidate submodules, configure
//! labels and branches, then install the report toolchain, its workflow
//! and the findings board. Hard failures abort; decoration failures are
//! collected as warnings and reported at the end.

use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::cli::CreateArgs;
use crate::client::{GitHubApi, GitHubClient};
use crate::config::{JobConfig, ProvisionJob};
use crate::error::{ConfigError, Result};
use crate::git::{CiStripPolicy, CredentialGuard, SubtreeMerger, Workspace, submodules};
use crate::outcome::RunReport;
use crate::provision::board::{BoardTemplate, provision_board};
use crate::provision::configure::{
    LabelTaxonomy, add_issue_template, create_auditor_branches, create_report_branch,
    replace_labels, tag_source_merge,
};
use crate::provision::report::{ReportTemplate, scaffold_report_branch};
use crate::provision::{MAIN_BRANCH, ci, repo};

/// Everything a provisioning run needs besides the job itself.
///
/// The taxonomy and template fields default to the Cyfrin conventions;
/// tests substitute local fixtures through the public fields.
pub struct Pipeline<'a, C> {
    pub client: &'a C,
    pub organization: &'a str,
    pub token: &'a str,
    pub labels: LabelTaxonomy,
    pub strip_policy: CiStripPolicy,
    pub report_template: ReportTemplate,
    pub board: BoardTemplate,
    /// Overrides the github.com remote for probing and pushing.
    /// Tests point this at a local path.
    pub remote_url: Option<String>,
}

impl<'a, C: GitHubApi> Pipeline<'a, C> {
    pub fn new(client: &'a C, organization: &'a str, token: &'a str) -> Self {
        Self {
            client,
            organization,
            token,
            labels: LabelTaxonomy::default(),
            strip_policy: CiStripPolicy::default(),
            report_template: ReportTemplate::default(),
            board: BoardTemplate::default(),
            remote_url: None,
        }
    }

    /// Run the full pipeline, assembling the repository under `workdir`.
    pub async fn run(&self, job: &ProvisionJob, workdir: &Path) -> Result<RunReport> {
        let org = self.organization;
        let name = &job.target_repo_name;
        let mut report = RunReport::new();

        let remote_url = match &self.remote_url {
            Some(url) => url.clone(),
            None => repo::github_remote_url(org, name, self.token),
        };

        let created = repo::create_target_repository(self.client, org, name, &remote_url).await?;
        report.complete("Create repository");

        let ws = Workspace::create(workdir.join(name))?;
        repo::initialize(&ws, name, &remote_url)?;
        report.complete("Initial commit");

        let guard = CredentialGuard::install(self.token);

        let merger = SubtreeMerger::new(&ws, self.token, &self.strip_policy);
        let bar = ProgressBar::new(job.sources.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        for source in &job.sources {
            bar.set_message(source.url.clone());
            let merged = merger.merge(source, MAIN_BRANCH)?;
            report.complete(format!("Merge {}", merged.dest));

            let tag = format!("{}-cyfrin-audit", merged.name);
            match tag_source_merge(self.client, org, name, &merged.name).await {
                Ok(()) => report.complete(format!("Tag {}", tag)),
                Err(e) => {
                    warn!("Error tagging {}: {}", merged.name, e);
                    report.warn(
                        format!("Tag {}", tag),
                        format!("create the tag manually: {}", e),
                    );
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        if submodules::consolidate(&ws, MAIN_BRANCH)? {
            report.complete("Consolidate submodules");
        }

        add_issue_template(self.client, org, name).await?;
        report.complete("Issue template");

        replace_labels(self.client, org, name, &self.labels).await;
        report.complete("Replace labels");

        // Branches point at whatever main is after the merges
        let head = self.client.latest_commit_sha(org, name, MAIN_BRANCH).await?;
        if !job.auditors.is_empty() {
            create_auditor_branches(self.client, org, name, &job.auditors, &head).await?;
            report.complete("Auditor branches");
        }
        create_report_branch(self.client, org, name, &head).await?;
        report.complete("Report branch");

        match scaffold_report_branch(
            &ws,
            self.token,
            &self.report_template,
            &job.sources,
            org,
            name,
        ) {
            Ok(()) => report.complete("Report toolchain"),
            Err(e) => {
                warn!("Error adding subtree: {}", e);
                report.warn(
                    "Report toolchain",
                    format!("install {} manually: {}", self.report_template.name, e),
                );
            }
        }
        drop(guard);

        let generator_path = self.report_template.subtree_path();
        match ci::install_workflow(self.client, org, name, &generator_path, Utc::now().date_naive())
            .await
        {
            Ok(()) => report.complete("Report workflow"),
            Err(e) => {
                warn!("Error setting up CI: {}", e);
                report.warn(
                    "Report workflow",
                    format!("set up CI manually using the generate-report.yml file: {}", e),
                );
            }
        }

        let title = job.project_title.as_deref().unwrap_or("");
        match provision_board(self.client, org, &created.node_id, &self.board, title).await {
            Ok(project_id) => {
                info!("Linked project board {}", project_id);
                report.complete("Project board");
            }
            Err(e) => {
                warn!("Error setting up project board: {}", e);
                report.warn(
                    "Project board",
                    format!("set up the project board manually: {}", e),
                );
            }
        }

        Ok(report)
    }
}

pub async fn run(args: &CreateArgs, api_url: Option<&str>) -> Result<()> {
    let job = JobConfig::load(&args.config_file)?.validate()?;
    let token = resolve_token(args.github_token.as_deref())?;
    let organization = resolve_organization(args.organization.as_deref())?;

    let client = match api_url {
        Some(url) => GitHubClient::with_base_url(token.clone(), url.to_string())?,
        None => GitHubClient::new(token.clone())?,
    };

    println!(
        "{}",
        format!("Provisioning {}/{}", organization, job.target_repo_name).bold()
    );
    if job.skipped > 0 {
        println!(
            "{} Skipped {} incomplete source entr{} in the job file",
            "⚠".yellow(),
            job.skipped,
            if job.skipped == 1 { "y" } else { "ies" }
        );
    }

    let workdir = tempfile::tempdir()?;
    let pipeline = Pipeline::new(&client, &organization, &token);
    let report = pipeline.run(&job, workdir.path()).await?;

    println!("{}", report.render());
    if report.has_warnings() {
        println!("{}", "Done, with warnings. Review the steps above.".yellow());
    } else {
        println!("{}", "Done!".green().bold());
    }
    Ok(())
}

/// Token precedence: flag, then environment (via clap), then a prompt
fn resolve_token(flag: Option<&str>) -> Result<String> {
    if let Some(token) = flag {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }
    let token = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("GitHub access token")
        .interact()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(ConfigError::MissingToken.into());
    }
    Ok(token)
}

fn resolve_organization(flag: Option<&str>) -> Result<String> {
    if let Some(org) = flag {
        let org = org.trim();
        if !org.is_empty() {
            return Ok(org.to_string());
        }
    }
    let org: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("GitHub organization")
        .interact_text()?;
    let org = org.trim().to_string();
    if org.is_empty() {
        return Err(ConfigError::MissingOrganization.into());
    }
    Ok(org)
}
