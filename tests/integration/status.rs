//! Tests for `tagwatch status` against a mock GitHub

use super::common::TestContext;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn snapshot_body(head: &str) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "repository": {
                "refs": {
                    "nodes": [
                        { "name": "v1.10.0", "target": { "oid": "tagobj", "target": { "oid": "c110" } } },
                        { "name": "v1.9.0", "target": { "oid": "c19" } }
                    ]
                },
                "defaultBranchRef": { "name": "main", "target": { "oid": head } }
            }
        }
    })
}

const RELEASE_PAGE: &str = r#"<html><body>
<div class="release">
  <a href="/owner/repo/compare/v1.10.0...main">
    <span>7</span> commits
  </a> to main since this release
</div>
</body></html>"#;

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json_when_behind() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body("head")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/owner/repo/releases/tag/v1.10.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RELEASE_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::new();
    ctx.write_config(&server.uri(), &ctx.temp.path().join("store"));

    let output = ctx
        .tagwatch()
        .args(["status", "owner/repo", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["repo"], "owner/repo");
    assert_eq!(status["default_branch"], "main");
    assert_eq!(status["latest_tag"], "v1.10.0");
    assert_eq!(status["is_up_to_date"], false);
    assert_eq!(status["ahead_by"], "7");

    // Second run is served from the on-disk cache; the mocks expect one call each
    ctx.tagwatch()
        .args(["status", "owner/repo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("main is ahead of v1.10.0 by 7 commit(s)"))
        .stdout(predicate::str::contains("/owner/repo/compare/v1.10.0...main"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_up_to_date_skips_release_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body("c110")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RELEASE_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = TestContext::new();
    ctx.write_config(&server.uri(), &ctx.temp.path().join("store"));

    ctx.tagwatch()
        .args(["status", "owner/repo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v1.10.0 is up to date with main"))
        .stdout(predicate::str::contains("/owner/repo/releases/tag/v1.10.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_reports_github_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "repository": null },
            "errors": [{ "message": "Could not resolve to a Repository with the name 'owner/missing'." }]
        })))
        .mount(&server)
        .await;

    let ctx = TestContext::new();
    ctx.write_config(&server.uri(), &ctx.temp.path().join("store"));

    ctx.tagwatch()
        .args(["status", "owner/missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GitHub error"))
        .stderr(predicate::str::contains("Could not resolve"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_fails_when_release_page_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body("head")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/owner/repo/releases/tag/v1.10.0"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let ctx = TestContext::new();
    ctx.write_config(&server.uri(), &ctx.temp.path().join("store"));

    ctx.tagwatch()
        .args(["status", "owner/repo", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to fetch release page"));
}
