//! Tests for argument handling and error reporting

use super::common::TestContext;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let ctx = TestContext::new();

    ctx.tagwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("cache"));
}

#[test]
fn test_status_requires_repo() {
    let ctx = TestContext::new();

    ctx.tagwatch().arg("status").assert().failure();
}

#[test]
fn test_status_rejects_malformed_repo() {
    let ctx = TestContext::new();

    ctx.tagwatch()
        .args(["status", "not-a-repo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid repository"))
        .stderr(predicate::str::contains("help: pass the repository as owner/name"));

    // Argument errors are reported before any config is touched
    assert!(!ctx.config_path().exists());
}

#[test]
fn test_unknown_subcommand_fails() {
    let ctx = TestContext::new();

    ctx.tagwatch().args(["cache", "shred"]).assert().failure();
}
