//! The check command: validate a job file and preview the run
//!
//! Everything here is offline. The command exists so a mistyped job file
//! is caught before `create` starts mutating the organization.

use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::cli::CheckArgs;
use crate::config::JobConfig;
use crate::error::Result;
use crate::git::subtree::repo_name;
use crate::provision::REPORT_BRANCH;

#[derive(Tabled)]
struct SourceRow {
    #[tabled(rename = "SOURCE")]
    source: String,
    #[tabled(rename = "COMMIT")]
    commit: String,
    #[tabled(rename = "DESTINATION")]
    destination: String,
}

/// Validate the job file and print what a create run would do
pub fn run(args: &CheckArgs) -> Result<()> {
    let job = JobConfig::load(&args.config_file)?.validate()?;

    println!("{}\n", "Provisioning plan".bold());
    println!(
        "Job file:   {}",
        args.config_file.display().to_string().cyan()
    );
    println!("Repository: {}", job.target_repo_name.cyan());
    match &job.project_title {
        Some(title) => println!("Board:      {}", title),
        None => println!("Board:      {}", "(default title)".dimmed()),
    }
    let mut branches: Vec<String> = job
        .auditors
        .iter()
        .map(|handle| format!("audit/{}", handle))
        .collect();
    branches.push(REPORT_BRANCH.to_string());
    println!("Branches:   {}", branches.join(", "));
    println!();

    let rows: Vec<SourceRow> = job
        .sources
        .iter()
        .map(|source| SourceRow {
            source: repo_name(&source.url),
            commit: source.commit.get(..8).unwrap_or(&source.commit).to_string(),
            destination: source
                .sub_folder
                .clone()
                .unwrap_or_else(|| repo_name(&source.url)),
        })
        .collect();
    let mut table = Table::new(&rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    println!("{}\n", table);

    if job.skipped > 0 {
        println!(
            "{} {} source entr{} missing sourceUrl or commitHash will be skipped",
            "⚠".yellow(),
            job.skipped,
            if job.skipped == 1 { "y" } else { "ies" }
        );
    }
    println!("{} Job file is valid", "✓".green());
    Ok(())
}
