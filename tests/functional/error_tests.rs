//! Error scenario functional tests for AuditForge
//!
//! These tests verify that AuditForge returns appropriate, actionable error
//! messages when operations against the real API fail. None of them create
//! repositories.

use tempfile::tempdir;

use super::{FunctionalTestContext, unique_repo_name, write_job_file};

// ============================================================================
// Authentication Errors
// ============================================================================

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_invalid_token_mentions_token_variable() {
    let Some(ctx) = FunctionalTestContext::from_env() else {
        eprintln!("skipping: AUDITFORGE_TEST_TOKEN / AUDITFORGE_TEST_ORGANIZATION not set");
        return;
    };

    let temp = tempdir().expect("failed to create temp dir");
    let repo_name = unique_repo_name("badtoken");
    let job = write_job_file(temp.path(), &repo_name);

    // An invalid token fails at repository creation, before any local work
    let stderr = ctx.run_failure(&[
        "create",
        "--config-file",
        job.to_str().expect("job path is not unicode"),
        "--github-token",
        "ghp_invalid_token_for_error_test",
    ]);
    assert!(
        stderr.contains("GITHUB_ACCESS_TOKEN") || stderr.contains("Authentication"),
        "expected a token hint, got: {}",
        stderr
    );
}

// ============================================================================
// Bad Organization Errors
// ============================================================================

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_unknown_organization_fails_cleanly() {
    let Some(ctx) = FunctionalTestContext::from_env() else {
        eprintln!("skipping: AUDITFORGE_TEST_TOKEN / AUDITFORGE_TEST_ORGANIZATION not set");
        return;
    };

    let temp = tempdir().expect("failed to create temp dir");
    let repo_name = unique_repo_name("badorg");
    let job = write_job_file(temp.path(), &repo_name);

    // Repository creation in a nonexistent organization must fail without
    // creating anything, and the message must not echo the token
    let stderr = ctx.run_failure(&[
        "create",
        "--config-file",
        job.to_str().expect("job path is not unicode"),
        "--organization",
        "auditforge-functest-no-such-org-99999",
    ]);
    assert!(!stderr.contains(&ctx.token), "token leaked: {}", stderr);
}
