//! Tests for `tagwatch cache`

use super::common::TestContext;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_cache_path_prints_default_dir_and_creates_config() {
    let ctx = TestContext::new();

    ctx.tagwatch()
        .args(["cache", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            ctx.default_cache_dir().to_string_lossy().to_string(),
        ));

    assert!(ctx.config_path().exists(), "default config should be written");
}

#[test]
fn test_cache_path_honors_config() {
    let ctx = TestContext::new();
    let custom = ctx.temp.path().join("elsewhere");
    ctx.write_config("https://api.github.com", &custom);

    ctx.tagwatch()
        .args(["cache", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(custom.to_string_lossy().to_string()));
}

#[test]
fn test_cache_clear_removes_entries() {
    let ctx = TestContext::new();
    let cache_dir = ctx.temp.path().join("store");
    ctx.write_config("https://api.github.com", &cache_dir);

    fs::create_dir_all(&cache_dir).unwrap();
    fs::write(cache_dir.join("0123.json"), "{}").unwrap();
    fs::write(cache_dir.join("4567.json"), "{}").unwrap();
    fs::write(cache_dir.join("notes.txt"), "keep").unwrap();

    ctx.tagwatch()
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 cache entries"));

    assert!(!cache_dir.join("0123.json").exists());
    assert!(cache_dir.join("notes.txt").exists());
}

#[test]
fn test_cache_clear_on_empty_cache() {
    let ctx = TestContext::new();
    ctx.write_config("https://api.github.com", &ctx.temp.path().join("empty"));

    ctx.tagwatch()
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 0 cache entries"));
}

#[test]
fn test_malformed_config_is_reported() {
    let ctx = TestContext::new();
    let path = ctx.config_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "github: [unclosed").unwrap();

    ctx.tagwatch()
        .args(["cache", "path"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
