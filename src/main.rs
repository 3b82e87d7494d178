//! AuditForge - provision Cyfrin security-audit repositories on GitHub

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod git;
mod outcome;
mod provision;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins over --debug for per-module filters
    let mut logger = env_logger::Builder::from_default_env();
    if cli.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    match cli.command {
        Commands::Create(args) => cli::create::run(&args, cli.api_url.as_deref()).await,
        Commands::Check(args) => cli::check::run(&args),
        Commands::Version => {
            println!("auditforge version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion { shell } => {
            cli::completions::run(shell);
            Ok(())
        }
    }
}
