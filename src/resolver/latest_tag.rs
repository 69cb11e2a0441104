//! Latest tag selection

use crate::github::types::Tag;
use serde::{Deserialize, Serialize};
use tagwatch_core::{compare_versions, is_version_like};

/// Latest tag of a repository and whether the default branch points at it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPublishState {
    /// `None` when the repository has no tags
    pub latest_tag: Option<String>,
    pub is_up_to_date: bool,
}

impl RepoPublishState {
    /// State of a repository without tags
    pub fn untagged() -> Self {
        Self {
            latest_tag: None,
            is_up_to_date: false,
        }
    }
}

/// Pick the latest tag from a newest-first list.
///
/// When every name is version-like the highest version wins, with ties
/// going to the later entry; otherwise the first (most recent) tag wins.
pub fn select_latest_tag(tags: &[Tag]) -> Option<&Tag> {
    let newest = tags.first()?;

    if tags.iter().all(|tag| is_version_like(&tag.name)) {
        // max_by returns the last of several equal maxima
        tags.iter().max_by(|a, b| compare_versions(&a.name, &b.name))
    } else {
        Some(newest)
    }
}

/// Resolve the publish state from the tag list and the default branch head
pub fn resolve_publish_state(tags: &[Tag], default_branch_oid: &str) -> RepoPublishState {
    match select_latest_tag(tags) {
        Some(tag) => RepoPublishState {
            latest_tag: Some(tag.name.clone()),
            is_up_to_date: tag.commit == default_branch_oid,
        },
        None => RepoPublishState::untagged(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[(&str, &str)]) -> Vec<Tag> {
        list.iter().map(|(name, commit)| Tag::new(*name, *commit)).collect()
    }

    #[test]
    fn test_no_tags() {
        let state = resolve_publish_state(&[], "abc");
        assert_eq!(
            state,
            RepoPublishState {
                latest_tag: None,
                is_up_to_date: false
            }
        );
    }

    #[test]
    fn test_version_tags_up_to_date() {
        let list = tags(&[("v2.0.0", "head"), ("v1.0.0", "old")]);
        let state = resolve_publish_state(&list, "head");

        assert_eq!(state.latest_tag.as_deref(), Some("v2.0.0"));
        assert!(state.is_up_to_date);
    }

    #[test]
    fn test_version_tags_behind() {
        let list = tags(&[("v2.0.0", "c2"), ("v1.0.0", "c1")]);
        let state = resolve_publish_state(&list, "head");

        assert_eq!(state.latest_tag.as_deref(), Some("v2.0.0"));
        assert!(!state.is_up_to_date);
    }

    #[test]
    fn test_highest_version_beats_recency() {
        // A backport tagged after the newer major release
        let list = tags(&[("v1.9.1", "backport"), ("v2.10.0", "c210"), ("v2.9.0", "c29")]);
        let state = resolve_publish_state(&list, "c210");

        assert_eq!(state.latest_tag.as_deref(), Some("v2.10.0"));
        assert!(state.is_up_to_date);
    }

    #[test]
    fn test_non_version_tag_falls_back_to_recency() {
        let list = tags(&[("hotfix-A", "hotfix"), ("v1.0.0", "c1")]);
        let state = resolve_publish_state(&list, "c1");

        assert_eq!(state.latest_tag.as_deref(), Some("hotfix-A"));
        assert!(!state.is_up_to_date);
    }

    #[test]
    fn test_mixed_prefixes_compare_numerically() {
        let list = tags(&[("r3", "c3"), ("v10", "c10"), ("9.5", "c95")]);
        assert_eq!(select_latest_tag(&list).unwrap().name, "v10");
    }

    #[test]
    fn test_ties_go_to_later_entry() {
        let list = tags(&[("v1.2.0", "first"), ("1.2.0", "second"), ("v1.0.0", "old")]);
        let latest = select_latest_tag(&list).unwrap();

        assert_eq!(latest.name, "1.2.0");
        assert_eq!(latest.commit, "second");
    }

    #[test]
    fn test_single_tag() {
        let list = tags(&[("nightly", "n")]);
        let state = resolve_publish_state(&list, "n");

        assert_eq!(state.latest_tag.as_deref(), Some("nightly"));
        assert!(state.is_up_to_date);
    }

    #[test]
    fn test_publish_state_rejects_string_shape() {
        let parsed: Result<RepoPublishState, _> =
            serde_json::from_value(serde_json::json!("v1.0.0"));
        assert!(parsed.is_err());
    }
}
