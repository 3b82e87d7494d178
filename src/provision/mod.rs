//! The provisioning steps that turn a config file into a ready audit repo
//!
//! Each submodule owns one phase of the pipeline. They are deliberately
//! independent: the orchestrator in `cli::create` decides which failures
//! abort the run and which merely degrade it.

pub mod board;
pub mod ci;
pub mod configure;
pub mod repo;
pub mod report;

/// Integration branch all merges land on
pub const MAIN_BRANCH: &str = "main";

/// Branch the report toolchain lives on
pub const REPORT_BRANCH: &str = "report";
