//! The workflow that drives report generation on the report branch

use chrono::NaiveDate;
use log::info;

use super::REPORT_BRANCH;
use crate::client::api::RepoAdminApi;
use crate::error::Result;

const WORKFLOW_NAME: &str = "generate-report";

/// Commit the report-generation workflow to the report branch.
///
/// The file goes through the contents API rather than the local clone:
/// the report branch was just force pushed, and a separate API commit
/// keeps this step independent of local state. `today` becomes the last
/// date fallback for runs where neither an input nor the runner clock
/// step produced one.
pub async fn install_workflow(
    client: &impl RepoAdminApi,
    org: &str,
    repo: &str,
    generator_path: &str,
    today: NaiveDate,
) -> Result<()> {
    let contents = workflow_contents(WORKFLOW_NAME, generator_path, REPORT_BRANCH, today);
    client
        .create_file(
            org,
            repo,
            &format!(".github/workflows/{}.yml", WORKFLOW_NAME),
            &format!("Add {} GitHub Action workflow", WORKFLOW_NAME),
            contents.as_bytes(),
            Some(REPORT_BRANCH),
        )
        .await?;

    info!("Successfully added {} workflow to {}", WORKFLOW_NAME, repo);
    Ok(())
}

fn workflow_contents(name: &str, generator_path: &str, branch: &str, today: NaiveDate) -> String {
    format!(
        r#"name: {name}

on:
  push:
    branches:
      - {branch}

jobs:
  generate-report:
    runs-on: ubuntu-latest
    steps:
      - name: Checkout repository
        uses: actions/checkout@v3

      - name: Get current date
        id: current-date
        run: echo "date=$(date +'%Y-%m-%d')" >> "$GITHUB_OUTPUT"

      - name: Generate report
        uses: ./.github/workflows/main.yml
        with:
          generator-path: {generator_path}
          output-path: ./
          time: ${{{{ github.event.inputs.time || steps.current-date.outputs.date || '{today}' }}}}
"#
    )
}
