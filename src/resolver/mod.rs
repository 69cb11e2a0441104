//! Pure resolution logic behind the tag status
//!
//! - [`latest_tag`] picks the latest tag and checks it against the default branch
//! - [`ahead_by`] reads the commit count from a release page

pub mod ahead_by;
pub mod latest_tag;

pub use ahead_by::{digits_only, extract_ahead_by};
pub use latest_tag::{resolve_publish_state, select_latest_tag, RepoPublishState};
