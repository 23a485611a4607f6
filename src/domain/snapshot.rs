//! The classified state of a working copy at resolution time.

use crate::domain::TagVersion;
use crate::error::{GitVersioningError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of an abbreviated commit hash
pub const SHORT_HASH_LEN: usize = 7;

/// Kind of ref checked out in the working copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    Tag,
    Branch,
    /// Detached HEAD without a tag pointing at it
    #[serde(alias = "rev")]
    Commit,
}

impl fmt::Display for RefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefType::Tag => "tag",
            RefType::Branch => "branch",
            RefType::Commit => "commit",
        };
        f.write_str(name)
    }
}

impl FromStr for RefType {
    type Err = GitVersioningError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tag" => Ok(RefType::Tag),
            "branch" => Ok(RefType::Branch),
            "commit" | "rev" => Ok(RefType::Commit),
            other => Err(GitVersioningError::snapshot(format!(
                "Unknown ref type '{}' - expected tag, branch or commit",
                other
            ))),
        }
    }
}

/// Publishing target implied by the checked-out ref
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Release,
    Snapshot,
}

impl Channel {
    /// Tags publish to the release channel, everything else is a pre-release
    pub fn for_snapshot(snapshot: &RefSnapshot) -> Self {
        match snapshot.ref_type() {
            RefType::Tag => Channel::Release,
            RefType::Branch | RefType::Commit => Channel::Snapshot,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Release => f.write_str("release"),
            Channel::Snapshot => f.write_str("snapshot"),
        }
    }
}

/// Immutable snapshot of ref state, built once per resolution.
///
/// Use [`RefSnapshotBuilder`] to construct one; the builder fills derived
/// fields and checks the tag/describe invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefSnapshot {
    ref_type: RefType,
    ref_name: String,
    commit_hash: String,
    commit_hash_short: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    describe_tag: Option<String>,
    distance: u64,
    dirty: bool,
    describe_tag_version: TagVersion,
}

impl RefSnapshot {
    pub fn builder(ref_type: RefType, commit_hash: impl Into<String>) -> RefSnapshotBuilder {
        RefSnapshotBuilder::new(ref_type, commit_hash)
    }

    pub fn ref_type(&self) -> RefType {
        self.ref_type
    }

    /// Tag or branch name; empty for a bare commit
    pub fn ref_name(&self) -> &str {
        &self.ref_name
    }

    pub fn commit_hash(&self) -> &str {
        &self.commit_hash
    }

    pub fn commit_hash_short(&self) -> &str {
        &self.commit_hash_short
    }

    pub fn describe_tag(&self) -> Option<&str> {
        self.describe_tag.as_deref()
    }

    pub fn describe_tag_version(&self) -> TagVersion {
        self.describe_tag_version
    }

    pub fn distance(&self) -> u64 {
        self.distance
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Builder for [`RefSnapshot`], also the on-disk snapshot format
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefSnapshotBuilder {
    ref_type: RefType,
    #[serde(default)]
    ref_name: String,
    commit_hash: String,
    #[serde(default)]
    commit_hash_short: Option<String>,
    #[serde(default)]
    describe_tag: Option<String>,
    #[serde(default)]
    describe_tag_version: Option<TagVersion>,
    #[serde(default)]
    distance: u64,
    #[serde(default)]
    dirty: bool,
}

impl RefSnapshotBuilder {
    pub fn new(ref_type: RefType, commit_hash: impl Into<String>) -> Self {
        RefSnapshotBuilder {
            ref_type,
            ref_name: String::new(),
            commit_hash: commit_hash.into(),
            commit_hash_short: None,
            describe_tag: None,
            describe_tag_version: None,
            distance: 0,
            dirty: false,
        }
    }

    pub fn ref_name(mut self, name: impl Into<String>) -> Self {
        self.ref_name = name.into();
        self
    }

    pub fn commit_hash_short(mut self, short: impl Into<String>) -> Self {
        self.commit_hash_short = Some(short.into());
        self
    }

    pub fn describe_tag(mut self, tag: impl Into<String>) -> Self {
        self.describe_tag = Some(tag.into());
        self
    }

    /// Override the version otherwise parsed out of the describe tag
    pub fn describe_tag_version(mut self, version: TagVersion) -> Self {
        self.describe_tag_version = Some(version);
        self
    }

    pub fn distance(mut self, distance: u64) -> Self {
        self.distance = distance;
        self
    }

    pub fn dirty(mut self, dirty: bool) -> Self {
        self.dirty = dirty;
        self
    }

    /// Validate and freeze the snapshot
    pub fn build(self) -> Result<RefSnapshot> {
        if self.commit_hash.is_empty() {
            return Err(GitVersioningError::snapshot("commit hash must not be empty"));
        }

        match self.ref_type {
            RefType::Tag | RefType::Branch if self.ref_name.is_empty() => {
                return Err(GitVersioningError::snapshot(format!(
                    "{} ref requires a name",
                    self.ref_type
                )));
            }
            RefType::Commit if !self.ref_name.is_empty() => {
                return Err(GitVersioningError::snapshot(format!(
                    "commit ref must not carry a name (got '{}')",
                    self.ref_name
                )));
            }
            _ => {}
        }

        if self.ref_type == RefType::Tag
            && self.describe_tag.as_deref() == Some(self.ref_name.as_str())
            && self.distance != 0
        {
            return Err(GitVersioningError::snapshot(format!(
                "tag '{}' is its own describe tag but distance is {}",
                self.ref_name, self.distance
            )));
        }

        let commit_hash_short = self
            .commit_hash_short
            .unwrap_or_else(|| self.commit_hash.chars().take(SHORT_HASH_LEN).collect());

        let describe_tag_version = match (self.describe_tag_version, self.describe_tag.as_deref()) {
            (Some(version), _) => version,
            (None, Some(tag)) => match TagVersion::parse(tag) {
                Some(version) => version,
                None if tag.chars().any(|c| c.is_ascii_digit()) => {
                    return Err(GitVersioningError::snapshot(format!(
                        "describe tag '{}' has a version number out of range",
                        tag
                    )));
                }
                None => TagVersion::default(),
            },
            (None, None) => TagVersion::default(),
        };

        Ok(RefSnapshot {
            ref_type: self.ref_type,
            ref_name: self.ref_name,
            commit_hash: self.commit_hash,
            commit_hash_short,
            describe_tag: self.describe_tag,
            distance: self.distance,
            dirty: self.dirty,
            describe_tag_version,
        })
    }
}
