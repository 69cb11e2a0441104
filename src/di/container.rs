//! Service container for dependency injection

use super::traits::{CacheStore, Clock, GitHubProvider};
use crate::cache::{FileStore, SystemClock};
use crate::config::Config;
use crate::core::TagwatchResult;
use crate::github::GitHubClient;
use crate::status::TagStatusService;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds the configuration and the collaborators behind trait objects, so
/// tests can swap in-memory doubles for GitHub, disk and the wall clock.
///
/// # Example (Testing)
///
/// ```
/// use tagwatch::cache::MemoryStore;
/// use tagwatch::config::Config;
/// use tagwatch::di::{ServiceContainer, mocks::*};
/// use std::sync::Arc;
///
/// let container = ServiceContainer::with_providers(
///     Config::default(),
///     Arc::new(MockGitHubProvider::new()),
///     Arc::new(MemoryStore::new()),
///     Arc::new(MockClock::default()),
/// );
/// let _service = container.status_service();
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<Config>,
    pub github: Arc<dyn GitHubProvider>,
    pub store: Arc<dyn CacheStore>,
    pub clock: Arc<dyn Clock>,
}

impl ServiceContainer {
    /// Create a new service container with production implementations
    ///
    /// - Loads config from disk (creating the default file on first run)
    /// - Opens the on-disk cache in the configured directory
    /// - Builds the GitHub HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Config file cannot be loaded or created
    /// - Cache directory cannot be created
    /// - The GitHub token is not a valid header value
    pub fn new() -> TagwatchResult<Self> {
        Self::from_config(Config::load()?)
    }

    /// Production implementations for an already-loaded config
    pub fn from_config(config: Config) -> TagwatchResult<Self> {
        let store = FileStore::new(config.get_cache_dir()?)?;
        let github = GitHubClient::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            github: Arc::new(github),
            store: Arc::new(store),
            clock: Arc::new(SystemClock),
        })
    }

    /// Create a service container with custom provider implementations
    pub fn with_providers(
        config: Config,
        github: Arc<dyn GitHubProvider>,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            github,
            store,
            clock,
        }
    }

    /// Build the cached tag status service from these collaborators
    pub fn status_service(&self) -> TagStatusService {
        TagStatusService::new(
            Arc::clone(&self.github),
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
            &self.config.cache,
        )
    }
}
