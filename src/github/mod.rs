//! GitHub integration
//!
//! This module provides the two network collaborators the resolvers need:
//! - The GraphQL metadata query for recent tags and the default branch head
//! - The release page fetch used to read the ahead-by count

pub mod client;
pub mod types;

pub use client::GitHubClient;
pub use types::{RepoRef, Tag, TagSnapshot};
