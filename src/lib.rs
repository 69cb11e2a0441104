//! Tagwatch: repository tag publish-state resolver
//!
//! This crate works out a repository's latest tag, whether the default
//! branch still points at it, and how many commits the branch has gained
//! since. The two network lookups behind that answer are memoized with a
//! stale-while-revalidate cache, re-exporting core functionality from
//! `tagwatch-core`.

pub use tagwatch_core::{compare_versions, is_version_like, TagwatchError, TagwatchResult};

/// Core module re-exported from tagwatch-core.
pub mod core {
    pub use tagwatch_core::core::*;
    pub use tagwatch_core::*;

    /// Path module re-exported from tagwatch-core.
    pub mod path {
        pub use tagwatch_core::core::path::*;
    }
}

/// Configuration management.
pub mod config;

/// Memoizing cache layer and its stores.
pub mod cache;

/// GitHub metadata query and release page fetch.
pub mod github;

/// Dependency injection infrastructure.
pub mod di;

/// Latest-tag selection and ahead-by extraction.
pub mod resolver;

/// Cached tag status lookups combining the resolvers.
pub mod status;
