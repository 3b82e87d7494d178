//! Repository-creating functional tests for AuditForge
//!
//! These tests run the full `create` pipeline against the real GitHub API.
//! Each test creates a repository with the `auditforge-functest-*` prefix;
//! AuditForge never deletes repositories, so the test prints a reminder to
//! remove it by hand.
//!
//! **IMPORTANT**: These tests modify the configured organization. They
//! require `AUDITFORGE_FUNCTIONAL_TESTS_CONFIRM=yes` in addition to the
//! test credentials.

use tempfile::tempdir;

use super::{FunctionalTestContext, unique_repo_name, write_job_file};

// ============================================================================
// Full Create Pipeline
// ============================================================================

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_create_provisions_repository() {
    let Some(ctx) = FunctionalTestContext::from_env() else {
        eprintln!("skipping: AUDITFORGE_TEST_TOKEN / AUDITFORGE_TEST_ORGANIZATION not set");
        return;
    };
    if !ctx.mutations_confirmed() {
        return;
    }

    let temp = tempdir().expect("failed to create temp dir");
    let repo_name = unique_repo_name("create");
    let job = write_job_file(temp.path(), &repo_name);

    let stdout = ctx.run_success(&[
        "create",
        "--config-file",
        job.to_str().expect("job path is not unicode"),
    ]);

    assert!(stdout.contains("Done"), "got: {}", stdout);
    assert!(stdout.contains("Create repository"), "got: {}", stdout);
    assert!(stdout.contains("Merge"), "got: {}", stdout);

    eprintln!(
        "\nNOTE: functional test created {}/{} - delete it by hand.",
        ctx.organization, repo_name
    );
}

#[test]
#[cfg_attr(not(feature = "functional-tests"), ignore)]
fn test_create_aborts_on_second_run() {
    let Some(ctx) = FunctionalTestContext::from_env() else {
        eprintln!("skipping: AUDITFORGE_TEST_TOKEN / AUDITFORGE_TEST_ORGANIZATION not set");
        return;
    };
    if !ctx.mutations_confirmed() {
        return;
    }

    let temp = tempdir().expect("failed to create temp dir");
    let repo_name = unique_repo_name("rerun");
    let job = write_job_file(temp.path(), &repo_name);
    let job_path = job.to_str().expect("job path is not unicode");

    ctx.run_success(&["create", "--config-file", job_path]);

    // The same job again must refuse to touch the existing repository
    let stderr = ctx.run_failure(&["create", "--config-file", job_path]);
    assert!(stderr.contains("already exists"), "got: {}", stderr);

    eprintln!(
        "\nNOTE: functional test created {}/{} - delete it by hand.",
        ctx.organization, repo_name
    );
}
