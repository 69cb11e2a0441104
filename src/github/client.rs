//! GitHub API client implementation

use crate::config::Config;
use crate::core::{TagwatchError, TagwatchResult};
use crate::di::traits::GitHubProvider;
use crate::github::types::{
    GraphQlRequest, GraphQlResponse, RepoRef, RepositoryData, TagSnapshot, TAG_QUERY_LIMIT,
};
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;

/// Recent tags (newest commit first) and the default branch head.
/// Annotated tags are followed one level to their commit.
const TAG_SNAPSHOT_QUERY: &str = r#"
query($owner: String!, $name: String!, $limit: Int!) {
  repository(owner: $owner, name: $name) {
    refs(first: $limit, refPrefix: "refs/tags/", orderBy: {field: TAG_COMMIT_DATE, direction: DESC}) {
      nodes {
        name
        target {
          oid
          ... on Tag {
            target {
              oid
            }
          }
        }
      }
    }
    defaultBranchRef {
      name
      target {
        oid
      }
    }
  }
}
"#;

/// GitHub API client
pub struct GitHubClient {
    http_client: HttpClient,
    api_url: String,
    web_url: String,
    token: Option<String>,
    rate_limiter: Arc<RateLimiter>,
}

/// Rate limiter for GitHub API
struct RateLimiter {
    remaining: Mutex<u64>,
    reset_time: Mutex<SystemTime>,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: &Config) -> TagwatchResult<Self> {
        Self::with_token(config, config.github_token())
    }

    /// Create a client with an explicit token, ignoring `GITHUB_TOKEN`
    pub fn with_token(config: &Config, token: Option<String>) -> TagwatchResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("tagwatch"),
        );

        if let Some(ref token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("bearer {}", token))
                    .map_err(|e| TagwatchError::Config(format!("Invalid GitHub token: {}", e)))?,
            );
        }

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TagwatchError::GitHub(format!("Failed to create HTTP client: {}", e)))?;

        let has_token = token.is_some();
        Ok(Self {
            http_client,
            api_url: config.github.api_url.trim_end_matches('/').to_string(),
            web_url: config.github.web_url.trim_end_matches('/').to_string(),
            token,
            rate_limiter: Arc::new(RateLimiter {
                remaining: Mutex::new(if has_token { 5000 } else { 60 }),
                reset_time: Mutex::new(SystemTime::now() + Duration::from_secs(3600)),
            }),
        })
    }

    /// Run the tag metadata query for a repository
    pub async fn fetch_tag_snapshot(&self, repo: &RepoRef) -> TagwatchResult<TagSnapshot> {
        let request = GraphQlRequest {
            query: TAG_SNAPSHOT_QUERY,
            variables: serde_json::json!({
                "owner": repo.owner,
                "name": repo.name,
                "limit": TAG_QUERY_LIMIT,
            }),
        };

        let url = format!("{}/graphql", self.api_url);
        let response: GraphQlResponse<RepositoryData> = self.graphql(&url, &request).await?;

        if !response.errors.is_empty() {
            let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(TagwatchError::GitHub(format!(
                "GraphQL query failed: {}",
                messages.join("; ")
            )));
        }

        let repository = response
            .data
            .and_then(|data| data.repository)
            .ok_or_else(|| TagwatchError::GitHub(format!("Repository {} not found", repo)))?;

        // Empty repositories have no default branch; report an empty head
        let (default_branch, default_branch_oid) = match repository.default_branch_ref {
            Some(branch) => (branch.name, branch.target.oid),
            None => (String::new(), String::new()),
        };

        let tags = repository
            .refs
            .nodes
            .into_iter()
            .map(|node| node.into_tag())
            .collect();

        Ok(TagSnapshot {
            tags,
            default_branch,
            default_branch_oid,
        })
    }

    /// Fetch the rendered release page for a tag
    pub async fn fetch_release_page(&self, repo: &RepoRef, tag: &str) -> TagwatchResult<String> {
        let url = self.release_page_url(repo, tag);
        tracing::debug!(%url, "fetching release page");

        let response = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "text/html")
            .send()
            .await
            .map_err(|e| TagwatchError::GitHub(format!("Release page request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(TagwatchError::GitHub(format!(
                "Failed to fetch release page {}: HTTP {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| TagwatchError::GitHub(format!("Failed to read release page: {}", e)))
    }

    /// `{web_url}/{owner}/{repo}/releases/tag/{tag}` with the tag escaped
    pub fn release_page_url(&self, repo: &RepoRef, tag: &str) -> String {
        format!(
            "{}/{}/{}/releases/tag/{}",
            self.web_url,
            repo.owner,
            repo.name,
            urlencoding::encode(tag)
        )
    }

    /// Make a GraphQL request and handle rate limiting
    async fn graphql<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        request: &GraphQlRequest<'_>,
    ) -> TagwatchResult<T> {
        self.check_rate_limit().await?;

        let response = self
            .http_client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| TagwatchError::GitHub(format!("GitHub API request failed: {}", e)))?;

        self.update_rate_limit(&response).await;

        if !response.status().is_success() {
            return Err(TagwatchError::GitHub(format!(
                "GitHub API error: HTTP {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            TagwatchError::GitHub(format!("Failed to parse GitHub API response: {}", e))
        })
    }

    /// Check if we're within rate limits
    async fn check_rate_limit(&self) -> TagwatchResult<()> {
        let remaining = *self.rate_limiter.remaining.lock().await;
        let reset_time = *self.rate_limiter.reset_time.lock().await;

        if remaining == 0 {
            let now = SystemTime::now();
            if now < reset_time {
                let wait_duration = reset_time.duration_since(now).unwrap_or(Duration::ZERO);
                return Err(TagwatchError::GitHub(format!(
                    "GitHub API rate limit exceeded. Reset in {} seconds. {}",
                    wait_duration.as_secs(),
                    if self.token.is_none() {
                        "Consider setting GITHUB_TOKEN to increase the rate limit."
                    } else {
                        ""
                    }
                )));
            }
        }

        Ok(())
    }

    /// Update rate limit from response headers
    async fn update_rate_limit(&self, response: &reqwest::Response) {
        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
        {
            *self.rate_limiter.remaining.lock().await = remaining;
        }

        if let Some(reset) = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
        {
            *self.rate_limiter.reset_time.lock().await =
                SystemTime::UNIX_EPOCH + Duration::from_secs(reset);
        }
    }
}

// Implement GitHubProvider trait
#[async_trait]
impl GitHubProvider for GitHubClient {
    async fn fetch_tag_snapshot(&self, repo: &RepoRef) -> TagwatchResult<TagSnapshot> {
        Self::fetch_tag_snapshot(self, repo).await
    }

    async fn fetch_release_page(&self, repo: &RepoRef, tag: &str) -> TagwatchResult<String> {
        Self::fetch_release_page(self, repo, tag).await
    }
}
