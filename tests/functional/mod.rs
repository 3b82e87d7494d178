//! Functional test harness for AuditForge
//!
//! This module provides a test context and safety guards for running
//! functional tests against the real GitHub API. Tests are opt-in via the
//! `functional-tests` feature and skip themselves when the test
//! credentials are not configured.
//!
//! # Usage
//!
//! ```bash
//! AUDITFORGE_TEST_TOKEN=ghp_... \
//! AUDITFORGE_TEST_ORGANIZATION=my-test-org \
//! AUDITFORGE_FUNCTIONAL_TESTS_CONFIRM=yes \
//! cargo test --features functional-tests --test functional
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

#[allow(deprecated)]
use assert_cmd::cargo::cargo_bin;
#[allow(unused_imports)]
use assert_cmd::prelude::*;

pub mod error_tests;
pub mod mutation_tests;

// ============================================================================
// Test Configuration
// ============================================================================

/// Prefix for test repositories, so leftovers are easy to spot and delete
pub const TEST_RESOURCE_PREFIX: &str = "auditforge-functest";

/// A tiny, frozen public repository that is safe to merge in tests.
/// Override with AUDITFORGE_TEST_SOURCE_URL / AUDITFORGE_TEST_SOURCE_COMMIT.
const DEFAULT_SOURCE_URL: &str = "https://github.com/octocat/Hello-World";
const DEFAULT_SOURCE_COMMIT: &str = "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d";

/// Warning banner printed before repository-creating tests run without
/// explicit confirmation
const MUTATION_WARNING: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║  ⚠️  REPOSITORY CREATION WARNING                                  ║
║                                                                   ║
║  This test creates a real repository in the configured            ║
║  organization. AuditForge never deletes repositories, so the      ║
║  test repo must be removed by hand afterwards.                    ║
║                                                                   ║
║  To proceed, set: AUDITFORGE_FUNCTIONAL_TESTS_CONFIRM=yes         ║
╚══════════════════════════════════════════════════════════════════╝
"#;

// ============================================================================
// FunctionalTestContext
// ============================================================================

/// Context for functional tests providing command execution and guards.
///
/// The context respects the following environment variables:
/// - `AUDITFORGE_TEST_TOKEN` - GitHub token used for all API calls
/// - `AUDITFORGE_TEST_ORGANIZATION` - organization repos are created in
/// - `AUDITFORGE_FUNCTIONAL_TESTS_CONFIRM=yes` - unlock mutation tests
pub struct FunctionalTestContext {
    pub token: String,
    pub organization: String,
    /// Path to the auditforge binary
    pub binary_path: PathBuf,
}

impl FunctionalTestContext {
    /// Build a context from the environment, or `None` when the test
    /// credentials are not configured. Callers skip in that case, so a
    /// plain `cargo test --features functional-tests` stays green on
    /// machines without credentials.
    pub fn from_env() -> Option<Self> {
        let token = env::var("AUDITFORGE_TEST_TOKEN").ok()?;
        let organization = env::var("AUDITFORGE_TEST_ORGANIZATION").ok()?;
        if token.is_empty() || organization.is_empty() {
            return None;
        }
        Some(Self {
            token,
            organization,
            binary_path: cargo_bin!("auditforge").to_path_buf(),
        })
    }

    /// Whether repository-creating tests are unlocked. Prints the warning
    /// banner when they are not.
    pub fn mutations_confirmed(&self) -> bool {
        if env::var("AUDITFORGE_FUNCTIONAL_TESTS_CONFIRM").as_deref() == Ok("yes") {
            return true;
        }
        eprintln!("{}", MUTATION_WARNING);
        false
    }

    /// Build a Command with credentials applied.
    ///
    /// This does NOT execute the command - use `run()` for that.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary_path);
        cmd.env("GITHUB_ACCESS_TOKEN", &self.token);
        cmd.env("GITHUB_ORGANIZATION", &self.organization);
        cmd.args(args);
        cmd
    }

    /// Execute command and return an assertion object for chaining.
    pub fn run(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command(args).assert()
    }

    /// Execute command and expect success, returning stdout as String.
    ///
    /// Panics if the command fails (non-zero exit code).
    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self
            .command(args)
            .output()
            .expect("Failed to execute command");

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!(
                "Command failed: auditforge {}\nstderr: {}",
                args.join(" "),
                stderr
            );
        }

        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Execute command and expect failure, returning stderr as String.
    ///
    /// Panics if the command succeeds.
    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self
            .command(args)
            .output()
            .expect("Failed to execute command");

        if output.status.success() {
            panic!(
                "Command unexpectedly succeeded: auditforge {}",
                args.join(" ")
            );
        }

        String::from_utf8_lossy(&output.stderr).to_string()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// A repository name unique to this test run
pub fn unique_repo_name(label: &str) -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}-{}-{}", TEST_RESOURCE_PREFIX, label, seconds)
}

/// Write a minimal single-source job file and return its path
pub fn write_job_file(dir: &std::path::Path, repo_name: &str) -> PathBuf {
    let source_url =
        env::var("AUDITFORGE_TEST_SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string());
    let source_commit = env::var("AUDITFORGE_TEST_SOURCE_COMMIT")
        .unwrap_or_else(|_| DEFAULT_SOURCE_COMMIT.to_string());

    let path = dir.join("config.json");
    let contents = format!(
        r#"{{
    "targetRepoName": "{repo_name}",
    "projectTitle": "{repo_name} board",
    "auditors": "auditforge-functest-reviewer",
    "repositories": [
        {{"sourceUrl": "{source_url}", "commitHash": "{source_commit}"}}
    ]
}}"#
    );
    fs::write(&path, contents).expect("failed to write job file");
    path
}
