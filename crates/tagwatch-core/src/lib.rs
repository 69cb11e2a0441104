//! Core utilities shared by the Tagwatch crates: the error type, platform
//! paths and the tag version comparator.

pub mod core;

pub use crate::core::error::{TagwatchError, TagwatchResult};
pub use crate::core::version::{compare_versions, is_version_like, VersionKey};
