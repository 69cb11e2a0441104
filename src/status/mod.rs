//! Cached tag status lookups
//!
//! [`TagStatusService`] owns the two memoized call sites: the publish state
//! (metadata query + latest tag selection) and the ahead-by count (release
//! page scrape). The ahead-by lookup needs the resolved tag name, so it
//! always runs after the publish state is known, and only when the default
//! branch has moved past the tag.

use crate::cache::{BoxFuture, CachePolicy, CachedFunction};
use crate::config::CacheSettings;
use crate::core::TagwatchResult;
use crate::di::traits::{CacheStore, Clock, GitHubProvider};
use crate::github::types::RepoRef;
use crate::resolver::{extract_ahead_by, resolve_publish_state, RepoPublishState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Input of the publish-state lookup
#[derive(Debug, Clone)]
struct PublishStateArgs {
    repo: RepoRef,
}

/// Input of the ahead-by lookup
#[derive(Debug, Clone)]
struct AheadByArgs {
    repo: RepoRef,
    tag: String,
}

/// Cached value of the publish-state lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishStateRecord {
    pub state: RepoPublishState,
    pub default_branch: String,
}

/// Everything a presenter needs to render the tag status of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStatus {
    pub repo: String,
    pub default_branch: String,
    pub latest_tag: Option<String>,
    pub is_up_to_date: bool,
    /// Digits of the commit count since the tag; `None` when up to date or
    /// untagged
    pub ahead_by: Option<String>,
}

impl TagStatus {
    /// Path (relative to the web root) a presenter would link to
    pub fn link_path(&self) -> Option<String> {
        let tag = self.latest_tag.as_ref()?;
        let tag = urlencoding::encode(tag);

        if self.is_up_to_date || self.default_branch.is_empty() {
            Some(format!("/{}/releases/tag/{}", self.repo, tag))
        } else {
            Some(format!(
                "/{}/compare/{}...{}",
                self.repo,
                tag,
                urlencoding::encode(&self.default_branch)
            ))
        }
    }

    /// Absolute link under `web_url`
    pub fn link_url(&self, web_url: &str) -> Option<String> {
        self.link_path()
            .map(|path| format!("{}{}", web_url.trim_end_matches('/'), path))
    }
}

/// Key of the publish-state entry for a repository
pub fn publish_state_key(repo: &RepoRef) -> String {
    format!("tagwatch:publish-state:{}", repo.name_with_owner())
}

/// Key of the ahead-by entry for a repository and tag
pub fn ahead_by_key(repo: &RepoRef, tag: &str) -> String {
    format!("tagwatch:ahead-by:{}:{}", repo.name_with_owner(), tag)
}

/// Tag status resolver with both lookups memoized
#[derive(Clone)]
pub struct TagStatusService {
    publish_state: CachedFunction<PublishStateArgs, PublishStateRecord>,
    ahead_by: CachedFunction<AheadByArgs, String>,
}

impl TagStatusService {
    pub fn new(
        github: Arc<dyn GitHubProvider>,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        settings: &CacheSettings,
    ) -> Self {
        Self::with_policies(
            github,
            store,
            clock,
            settings.publish_state.to_policy(),
            settings.ahead_by.to_policy(),
        )
    }

    pub fn with_policies(
        github: Arc<dyn GitHubProvider>,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        publish_state_policy: CachePolicy,
        ahead_by_policy: CachePolicy,
    ) -> Self {
        let snapshot_source = Arc::clone(&github);
        let publish_state = CachedFunction::builder(
            "publish-state",
            Arc::clone(&store),
            Arc::clone(&clock),
            publish_state_policy,
            |args: &PublishStateArgs| publish_state_key(&args.repo),
            move |args: PublishStateArgs| -> BoxFuture<TagwatchResult<PublishStateRecord>> {
                let github = Arc::clone(&snapshot_source);
                Box::pin(async move {
                    let snapshot = github.fetch_tag_snapshot(&args.repo).await?;
                    Ok(PublishStateRecord {
                        state: resolve_publish_state(&snapshot.tags, &snapshot.default_branch_oid),
                        default_branch: snapshot.default_branch,
                    })
                })
            },
        )
        // Earlier entries held a bare tag name string
        .should_revalidate(|value| !value.is_object())
        .build();

        let page_source = github;
        let ahead_by = CachedFunction::new(
            "ahead-by",
            store,
            clock,
            ahead_by_policy,
            |args: &AheadByArgs| ahead_by_key(&args.repo, &args.tag),
            move |args: AheadByArgs| -> BoxFuture<TagwatchResult<String>> {
                let github = Arc::clone(&page_source);
                Box::pin(async move {
                    let html = github.fetch_release_page(&args.repo, &args.tag).await?;
                    extract_ahead_by(&html)
                })
            },
        );

        Self {
            publish_state,
            ahead_by,
        }
    }

    /// Latest tag and whether the default branch points at it
    pub async fn publish_state(&self, repo: &RepoRef) -> TagwatchResult<PublishStateRecord> {
        self.publish_state
            .call(PublishStateArgs { repo: repo.clone() })
            .await
    }

    /// Commits on the default branch since `tag`, as a digit string.
    ///
    /// Only meaningful when the branch is not up to date with the tag; the
    /// release page has no compare link otherwise and this fails with
    /// `MissingElement`.
    pub async fn ahead_by(&self, repo: &RepoRef, tag: &str) -> TagwatchResult<String> {
        self.ahead_by
            .call(AheadByArgs {
                repo: repo.clone(),
                tag: tag.to_string(),
            })
            .await
    }

    /// Wait for background refreshes started by earlier lookups
    pub async fn wait_for_revalidations(&self) {
        self.publish_state.wait_for_revalidations().await;
        self.ahead_by.wait_for_revalidations().await;
    }

    /// Full status: publish state first, then the ahead-by count when the
    /// branch has moved past the tag. Errors from either lookup are returned.
    pub async fn status(&self, repo: &RepoRef) -> TagwatchResult<TagStatus> {
        let record = self.publish_state(repo).await?;

        let ahead_by = match record.state.latest_tag {
            Some(ref tag) if !record.state.is_up_to_date => {
                Some(self.ahead_by(repo, tag).await?)
            }
            _ => None,
        };

        Ok(TagStatus {
            repo: repo.name_with_owner(),
            default_branch: record.default_branch,
            latest_tag: record.state.latest_tag,
            is_up_to_date: record.state.is_up_to_date,
            ahead_by,
        })
    }
}
