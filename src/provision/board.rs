//! Copying the findings project board from the organization template

use log::{info, warn};

use crate::client::api::ProjectBoardApi;
use crate::error::Result;

/// Fallback title when the job config does not name the board
pub const DEFAULT_PROJECT_TITLE: &str = "DEFAULT PROJECT";

/// The organization project used as the findings board template
pub struct BoardTemplate {
    /// Project number, as it appears in the board URL
    pub project_number: u64,
}

impl Default for BoardTemplate {
    fn default() -> Self {
        Self { project_number: 7 }
    }
}

/// Copy the findings board template and attach it to the repository.
///
/// Failing to copy fails the step; making the board private and linking
/// it to the repository are refinements that only warn, so a partially
/// configured board still comes through.
pub async fn provision_board(
    client: &impl ProjectBoardApi,
    org: &str,
    repo_node_id: &str,
    template: &BoardTemplate,
    title: &str,
) -> Result<String> {
    let title = if title.is_empty() {
        DEFAULT_PROJECT_TITLE
    } else {
        title
    };

    let owner_id = client.org_node_id(org).await?;
    let template_id = client.project_node_id(org, template.project_number).await?;
    let project_id = client.copy_project(&owner_id, &template_id, title).await?;
    info!("Created project board {}", title);

    if let Err(e) = client
        .update_project(&project_id, false, Some("Findings board for a Cyfrin audit"))
        .await
    {
        warn!("Could not update board visibility: {}", e);
    }
    if let Err(e) = client.link_project(&project_id, repo_node_id).await {
        warn!("Could not link board to repository: {}", e);
    }

    Ok(project_id)
}
