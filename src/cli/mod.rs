//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
pub use clap_complete::Shell;

pub mod check;
pub mod completions;
pub mod create;

/// AuditForge - provision Cyfrin security-audit repositories on GitHub
#[derive(Parser, Debug)]
#[command(name = "auditforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(long, global = true, env = "AUDITFORGE_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Override the GitHub API base URL (GitHub Enterprise, testing)
    #[arg(long, global = true, env = "GITHUB_API_URL", hide_env = true)]
    pub api_url: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create and provision the audit repository described by a job file
    #[command(after_help = "\
EXAMPLES:
  auditforge create                                # Use ./config.json
  auditforge create --config-file audits/acme.yaml # YAML job file
  auditforge create --organization CyfrinAudits    # Override the org

The GitHub token and organization fall back to the GITHUB_ACCESS_TOKEN
and GITHUB_ORGANIZATION environment variables, and are prompted for
interactively when neither the flag nor the variable is set.")]
    Create(CreateArgs),

    /// Validate a job file and show the provisioning plan without touching GitHub
    Check(CheckArgs),

    /// Display version information
    Version,

    /// Generate shell completions
    #[command(after_help = "\
Completions (subcommands/flags):
  bash:   auditforge completion bash > /etc/bash_completion.d/auditforge
  zsh:    auditforge completion zsh > \"${fpath[1]}/_auditforge\"
  fish:   auditforge completion fish > ~/.config/fish/completions/auditforge.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Path to the provisioning job file (JSON or YAML)
    #[arg(long, default_value = "config.json")]
    pub config_file: PathBuf,

    /// GitHub token with repo, project and workflow scopes
    #[arg(long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub organization that receives the audit repository
    #[arg(long, env = "GITHUB_ORGANIZATION")]
    pub organization: Option<String>,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the provisioning job file (JSON or YAML)
    #[arg(long, default_value = "config.json")]
    pub config_file: PathBuf,
}
