//! GitHub API type definitions

use crate::core::{TagwatchError, TagwatchResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Repository identity (`owner/name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`, as used in cache keys and URLs
    pub fn name_with_owner(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = TagwatchError;

    fn from_str(s: &str) -> TagwatchResult<Self> {
        let trimmed = s.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        let valid_part = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };

        match trimmed.split_once('/') {
            Some((owner, name)) if valid_part(owner) && valid_part(name) => {
                Ok(Self::new(owner, name))
            }
            _ => Err(TagwatchError::InvalidRepo(format!(
                "expected owner/name, got '{}'",
                s
            ))),
        }
    }
}

/// A tag and the commit it ultimately points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    /// Commit oid, with annotated-tag objects already dereferenced
    pub commit: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit: commit.into(),
        }
    }
}

/// Result of the metadata query: recent tags plus the default branch head
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSnapshot {
    /// Newest first by commit date, at most [`TAG_QUERY_LIMIT`]
    pub tags: Vec<Tag>,
    pub default_branch: String,
    pub default_branch_oid: String,
}

/// Number of tag refs requested per query
pub const TAG_QUERY_LIMIT: usize = 20;

/// GraphQL request body
#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepositoryNode {
    pub refs: RefConnection,
    pub default_branch_ref: Option<DefaultBranchRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefConnection {
    #[serde(default)]
    pub nodes: Vec<RefNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefNode {
    pub name: String,
    pub target: RefTarget,
}

/// A ref target: either a commit, or an annotated tag whose own
/// `target` is the commit
#[derive(Debug, Deserialize)]
pub(crate) struct RefTarget {
    pub oid: String,
    #[serde(default)]
    pub target: Option<TargetOid>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TargetOid {
    pub oid: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DefaultBranchRef {
    pub name: String,
    pub target: TargetOid,
}

impl RefNode {
    pub fn into_tag(self) -> Tag {
        let commit = match self.target.target {
            Some(inner) => inner.oid,
            None => self.target.oid,
        };
        Tag {
            name: self.name,
            commit,
        }
    }
}
