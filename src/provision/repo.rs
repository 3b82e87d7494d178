//! Creating and seeding the target repository

use log::{info, warn};

use super::MAIN_BRANCH;
use crate::client::RepoInfo;
use crate::client::api::RepoAdminApi;
use crate::error::{ApiError, Result};
use crate::git::Workspace;
use crate::git::subtree::remote_exists;

const BOT_NAME: &str = "Cyfrin Bot";
const BOT_EMAIL: &str = "bot@cyfrin.io";

/// Authenticated clone URL for a repository in the organization
pub fn github_remote_url(org: &str, name: &str, token: &str) -> String {
    if token.is_empty() {
        format!("https://github.com/{}/{}.git", org, name)
    } else {
        format!("https://{}@github.com/{}/{}.git", token, org, name)
    }
}

/// Create the audit repository after checking nothing is in the way.
///
/// An existing repository under the same name aborts the run before any
/// local work starts, so a mistyped config cannot push into it.
pub async fn create_target_repository(
    client: &impl RepoAdminApi,
    org: &str,
    name: &str,
    remote_url: &str,
) -> Result<RepoInfo> {
    if remote_exists(remote_url) {
        return Err(ApiError::Conflict(format!("repository {}/{}", org, name)).into());
    }

    info!("Creating private repository {}/{}", org, name);
    client.create_org_repo(org, name, true).await
}

/// Seed the fresh repository with a README and push the first commit.
///
/// A failed push is reported and tolerated; everything after this step
/// pushes again and the run should not die on a transient network error.
pub fn initialize(ws: &Workspace, name: &str, remote_url: &str) -> Result<()> {
    ws.init(MAIN_BRANCH)?;
    std::fs::write(ws.root().join("README.md"), readme_contents(name))?;
    ws.set_identity(BOT_NAME, BOT_EMAIL)?;
    ws.add_remote("origin", remote_url)?;
    ws.commit_all("Initial commit")?;

    let branch = match ws.current_branch() {
        Ok(branch) if !branch.is_empty() => branch,
        _ => MAIN_BRANCH.to_string(),
    };
    if let Err(e) = ws.push_upstream("origin", &branch) {
        warn!("Failed to push initial commit: {}", e);
        info!("Continuing anyway");
    }
    Ok(())
}

fn readme_contents(name: &str) -> String {
    format!(
        "# {}\n\
         \n\
         ## Getting Started\n\
         Clone the repository:\n\
         \n\
         ```bash\n\
         git clone --recurse-submodules [repository-url]\n\
         ```\n\
         The source code for all audit target repositories has been merged into this \
         repository using git subtree, ensuring that all code and history is preserved \
         even if the original repositories are moved or deleted.\n",
        name
    )
}
