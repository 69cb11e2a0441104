//! Trait definitions for dependency injection

use crate::cache::StoredEntry;
use crate::core::TagwatchResult;
use crate::github::types::{RepoRef, TagSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for the GitHub collaborators
///
/// Performs the two network lookups the resolvers depend on. Failures are
/// returned as-is; retries, if any, belong to the implementation.
#[async_trait]
pub trait GitHubProvider: Send + Sync {
    /// Recent tags (newest commit first, annotated tags dereferenced) and
    /// the default branch head
    async fn fetch_tag_snapshot(&self, repo: &RepoRef) -> TagwatchResult<TagSnapshot>;

    /// Rendered HTML of the release page for `tag`
    async fn fetch_release_page(&self, repo: &RepoRef, tag: &str) -> TagwatchResult<String>;
}

/// Trait for cache storage
///
/// A key-value store of [`StoredEntry`] values addressed by opaque string
/// keys. Implementations do not interpret entries; age checks happen in
/// the cache layer.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the entry for a key, `None` when absent
    async fn get(&self, key: &str) -> TagwatchResult<Option<StoredEntry>>;

    /// Write or overwrite the entry for a key
    async fn set(&self, key: &str, entry: StoredEntry) -> TagwatchResult<()>;

    /// Remove the entry for a key (absent keys are not an error)
    async fn remove(&self, key: &str) -> TagwatchResult<()>;

    /// Remove every entry, returning how many were removed
    async fn clear(&self) -> TagwatchResult<usize>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
