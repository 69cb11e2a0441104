//! Dependency injection infrastructure for Tagwatch
//!
//! This module provides trait-based dependency injection so the resolvers
//! can run against real GitHub and disk, or against in-memory doubles.
//!
//! # Example (Production)
//! ```no_run
//! use tagwatch::di::ServiceContainer;
//!
//! # fn example() -> tagwatch::core::TagwatchResult<()> {
//! let container = ServiceContainer::new()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use tagwatch::cache::MemoryStore;
//! use tagwatch::config::Config;
//! use tagwatch::di::{ServiceContainer, mocks::*};
//! use std::sync::Arc;
//!
//! let github = Arc::new(MockGitHubProvider::new());
//! let store = Arc::new(MemoryStore::new());
//! let clock = Arc::new(MockClock::default());
//!
//! let container = ServiceContainer::with_providers(Config::default(), github, store, clock);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{CacheStore, Clock, GitHubProvider};
