//! Memoizing cache layer
//!
//! [`CachedFunction`] wraps an async computation and stores its results in a
//! [`CacheStore`] under a caller-derived key. Each stored entry carries the
//! [`CachePolicy`] it was written with, and a read classifies it as
//! [`Freshness::Fresh`], [`Freshness::Stale`] or [`Freshness::Expired`]:
//!
//! - fresh values are returned as-is;
//! - stale values are returned immediately while a detached task recomputes
//!   and overwrites the entry (failures there are logged and dropped);
//! - expired, missing, undecodable or rejected values cause a synchronous
//!   recomputation whose result replaces the entry.
//!
//! Losing the store only costs performance: read and write failures are
//! logged and treated as a miss.

pub mod store;

pub use store::{FileStore, MemoryStore};

use crate::core::TagwatchResult;
use crate::di::traits::{CacheStore, Clock};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Boxed future returned by cached computations
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

type ComputeFn<A, V> = dyn Fn(A) -> BoxFuture<TagwatchResult<V>> + Send + Sync;
type KeyFn<A> = dyn Fn(&A) -> String + Send + Sync;
type RevalidateFn = dyn Fn(&serde_json::Value) -> bool + Send + Sync;

/// How long a stored value may be served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Window in which the value is fresh
    pub max_age: Duration,
    /// Extra window after `max_age` in which the value is served while
    /// being refreshed in the background
    pub stale_while_revalidate: Option<Duration>,
}

/// Classification of a stored entry at read time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
    Expired,
}

impl CachePolicy {
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            stale_while_revalidate: None,
        }
    }

    pub fn with_stale_while_revalidate(mut self, window: Duration) -> Self {
        self.stale_while_revalidate = Some(window);
        self
    }

    /// Classify a value stored at `stored_at` as seen at `now`.
    ///
    /// Both window bounds are inclusive. A `stored_at` in the future (clock
    /// skew) counts as age zero.
    pub fn freshness(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> Freshness {
        let age = (now - stored_at).to_std().unwrap_or(Duration::ZERO);

        if age <= self.max_age {
            return Freshness::Fresh;
        }

        match self.stale_while_revalidate {
            Some(window) if age <= self.max_age.saturating_add(window) => Freshness::Stale,
            _ => Freshness::Expired,
        }
    }
}

/// A stored value plus the metadata needed to judge its age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Serialized value, kept untyped so shape drift is detectable
    pub value: serde_json::Value,
    pub stored_at: DateTime<Utc>,
    pub policy: CachePolicy,
}

impl StoredEntry {
    pub fn freshness(&self, now: DateTime<Utc>) -> Freshness {
        self.policy.freshness(self.stored_at, now)
    }
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// An async computation memoized in a [`CacheStore`].
///
/// Concurrent calls on a cold key each run the computation; there is no
/// in-flight de-duplication.
pub struct CachedFunction<A, V> {
    inner: Arc<Inner<A, V>>,
}

struct Inner<A, V> {
    name: &'static str,
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    cache_key: Box<KeyFn<A>>,
    should_revalidate: Option<Box<RevalidateFn>>,
    compute: Box<ComputeFn<A, V>>,
    /// Number of background revalidations still running
    in_flight: Arc<watch::Sender<usize>>,
}

/// Decrements the in-flight count when a revalidation task ends, panics included
struct InFlightGuard(Arc<watch::Sender<usize>>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Unshared [`CachedFunction`] under construction
pub struct CachedFunctionBuilder<A, V> {
    inner: Inner<A, V>,
}

impl<A, V> CachedFunctionBuilder<A, V> {
    /// Reject stored values for which `predicate` returns true, whatever
    /// their age. Guards against entries written with an older value shape.
    pub fn should_revalidate<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&serde_json::Value) -> bool + Send + Sync + 'static,
    {
        self.inner.should_revalidate = Some(Box::new(predicate));
        self
    }

    pub fn build(self) -> CachedFunction<A, V> {
        CachedFunction {
            inner: Arc::new(self.inner),
        }
    }
}

impl<A, V> Clone for CachedFunction<A, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, V> CachedFunction<A, V>
where
    A: Send + 'static,
    V: Serialize + DeserializeOwned + Send + 'static,
{
    /// Wrap `compute`. `name` identifies the call site in logs; the key
    /// function must encode every input that affects the result.
    pub fn new<K, F>(
        name: &'static str,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
        cache_key: K,
        compute: F,
    ) -> Self
    where
        K: Fn(&A) -> String + Send + Sync + 'static,
        F: Fn(A) -> BoxFuture<TagwatchResult<V>> + Send + Sync + 'static,
    {
        Self::builder(name, store, clock, policy, cache_key, compute).build()
    }

    /// Like [`CachedFunction::new`], but returns a builder for the optional
    /// settings
    pub fn builder<K, F>(
        name: &'static str,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
        cache_key: K,
        compute: F,
    ) -> CachedFunctionBuilder<A, V>
    where
        K: Fn(&A) -> String + Send + Sync + 'static,
        F: Fn(A) -> BoxFuture<TagwatchResult<V>> + Send + Sync + 'static,
    {
        CachedFunctionBuilder {
            inner: Inner {
                name,
                store,
                clock,
                policy,
                cache_key: Box::new(cache_key),
                should_revalidate: None,
                compute: Box::new(compute),
                in_flight: Arc::new(watch::channel(0).0),
            },
        }
    }

    /// Key the given arguments would be stored under
    pub fn key_for(&self, args: &A) -> String {
        (self.inner.cache_key)(args)
    }

    /// Wait until every background revalidation started so far has finished
    pub async fn wait_for_revalidations(&self) {
        let mut rx = self.inner.in_flight.subscribe();
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Return the memoized value for `args`, computing it when needed
    pub async fn call(&self, args: A) -> TagwatchResult<V> {
        let key = self.key_for(&args);

        if let Some(entry) = self.lookup(&key).await {
            let freshness = entry.freshness(self.inner.clock.now());
            match freshness {
                Freshness::Fresh | Freshness::Stale => {
                    if let Some(value) = self.decode(&key, entry) {
                        if freshness == Freshness::Stale {
                            tracing::debug!(cache = self.inner.name, %key, "serving stale value");
                            self.spawn_revalidation(key, args);
                        } else {
                            tracing::debug!(cache = self.inner.name, %key, "cache hit");
                        }
                        return Ok(value);
                    }
                }
                Freshness::Expired => {
                    tracing::debug!(cache = self.inner.name, %key, "cache entry expired");
                }
            }
        } else {
            tracing::debug!(cache = self.inner.name, %key, "cache miss");
        }

        self.compute_and_store(&key, args).await
    }

    async fn lookup(&self, key: &str) -> Option<StoredEntry> {
        match self.inner.store.get(key).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(cache = self.inner.name, %key, error = %e, "cache read failed");
                None
            }
        }
    }

    /// Typed value of an entry, or `None` when it must be recomputed
    fn decode(&self, key: &str, entry: StoredEntry) -> Option<V> {
        if let Some(ref should_revalidate) = self.inner.should_revalidate {
            if should_revalidate(&entry.value) {
                tracing::debug!(cache = self.inner.name, %key, "stored value rejected");
                return None;
            }
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(cache = self.inner.name, %key, error = %e, "stored value has an outdated shape");
                None
            }
        }
    }

    async fn compute_and_store(&self, key: &str, args: A) -> TagwatchResult<V> {
        let value = (self.inner.compute)(args).await?;

        match serde_json::to_value(&value) {
            Ok(raw) => {
                let entry = StoredEntry {
                    value: raw,
                    stored_at: self.inner.clock.now(),
                    policy: self.inner.policy,
                };
                if let Err(e) = self.inner.store.set(key, entry).await {
                    tracing::warn!(cache = self.inner.name, %key, error = %e, "cache write failed");
                }
            }
            Err(e) => {
                tracing::warn!(cache = self.inner.name, %key, error = %e, "value not cacheable");
            }
        }

        Ok(value)
    }

    /// Recompute in a detached task. Only a successful result touches the
    /// store; errors stay inside the task.
    fn spawn_revalidation(&self, key: String, args: A) {
        let this = self.clone();
        self.inner.in_flight.send_modify(|n| *n += 1);
        let guard = InFlightGuard(Arc::clone(&self.inner.in_flight));
        tokio::spawn(async move {
            let _guard = guard;
            match this.compute_and_store(&key, args).await {
                Ok(_) => tracing::debug!(cache = this.inner.name, %key, "revalidated"),
                Err(e) => tracing::debug!(
                    cache = this.inner.name,
                    %key,
                    error = %e,
                    "background revalidation failed"
                ),
            }
        });
    }
}
