//! Mock implementations of service traits for testing

use super::traits::{Clock, GitHubProvider};
use crate::core::{TagwatchError, TagwatchResult};
use crate::github::types::{RepoRef, TagSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock GitHub provider for testing
///
/// Serves canned snapshots and release pages and counts calls.
///
/// # Example
///
/// ```
/// use tagwatch::di::mocks::MockGitHubProvider;
/// use tagwatch::github::{RepoRef, Tag, TagSnapshot};
///
/// let github = MockGitHubProvider::new();
/// github.add_snapshot(
///     &RepoRef::new("owner", "repo"),
///     TagSnapshot {
///         tags: vec![Tag::new("v1.0.0", "abc")],
///         default_branch: "main".to_string(),
///         default_branch_oid: "abc".to_string(),
///     },
/// );
/// assert_eq!(github.snapshot_calls(), 0);
/// ```
#[derive(Default)]
pub struct MockGitHubProvider {
    snapshots: Mutex<HashMap<RepoRef, TagSnapshot>>,
    release_pages: Mutex<HashMap<(RepoRef, String), String>>,
    failing: AtomicBool,
    snapshot_calls: AtomicUsize,
    release_page_calls: AtomicUsize,
}

impl MockGitHubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the snapshot returned for a repository
    pub fn add_snapshot(&self, repo: &RepoRef, snapshot: TagSnapshot) {
        lock(&self.snapshots).insert(repo.clone(), snapshot);
    }

    /// Set (or replace) the release page HTML for a tag
    pub fn add_release_page(&self, repo: &RepoRef, tag: &str, html: impl Into<String>) {
        lock(&self.release_pages).insert((repo.clone(), tag.to_string()), html.into());
    }

    /// Make every subsequent call fail with a GitHub error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn snapshot_calls(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
    }

    pub fn release_page_calls(&self) -> usize {
        self.release_page_calls.load(Ordering::SeqCst)
    }

    fn check_failing(&self) -> TagwatchResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(TagwatchError::GitHub("simulated network failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GitHubProvider for MockGitHubProvider {
    async fn fetch_tag_snapshot(&self, repo: &RepoRef) -> TagwatchResult<TagSnapshot> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        lock(&self.snapshots)
            .get(repo)
            .cloned()
            .ok_or_else(|| TagwatchError::GitHub(format!("Repository {} not found", repo)))
    }

    async fn fetch_release_page(&self, repo: &RepoRef, tag: &str) -> TagwatchResult<String> {
        self.release_page_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        lock(&self.release_pages)
            .get(&(repo.clone(), tag.to_string()))
            .cloned()
            .ok_or_else(|| {
                TagwatchError::GitHub(format!("Failed to fetch release page {}: HTTP 404", tag))
            })
    }
}

/// Mock clock for testing
///
/// Starts at a fixed instant and only moves when told to.
pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl MockClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = lock(&self.now);
        *now += by;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default())
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *lock(&self.now)
    }
}
