//! Repository inspection
//!
//! Produces the [`RefSnapshot`] the resolver consumes. Inspection sits
//! behind the [Repository] trait so snapshot capture can run against a real
//! repository or an in-memory one:
//!
//! - [repository::Git2Repository]: backed by the `git2` crate
//! - [mock::MockRepository]: a scripted history for tests
//!
//! ```rust,no_run
//! # use git_versioning::config::Config;
//! # use git_versioning::git::{capture_snapshot, Git2Repository};
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let repo = Git2Repository::open(".")?;
//! let snapshot = capture_snapshot(&repo, &config.describe_options()?, &config.rule_set()?)?;
//! println!("{}", config.resolver()?.resolve(&snapshot)?);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{RefSnapshot, RefType, TagVersion};
use crate::error::Result;
use crate::rules::{RefPattern, RuleSet};
use tracing::debug;

/// Commit hash reported for a repository without commits
pub const NULL_COMMIT_HASH: &str = "0000000000000000000000000000000000000000";

/// Where HEAD points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadInfo {
    /// Checked-out branch, `None` when detached
    pub branch: Option<String>,
    /// Full hash of the HEAD commit, `None` for an unborn branch
    pub commit: Option<String>,
}

/// Nearest reachable tag and the number of commits walked to reach it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Describe {
    pub tag: Option<String>,
    pub distance: u64,
}

/// Settings that shape the describe walk
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeOptions {
    /// Follow only the first parent of merge commits
    pub first_parent: bool,
    /// Tags that may serve as describe tags
    pub tag_pattern: RefPattern,
}

impl Default for DescribeOptions {
    fn default() -> Self {
        DescribeOptions {
            first_parent: false,
            tag_pattern: RefPattern::compile(".*").expect("match-all pattern compiles"),
        }
    }
}

/// Read-only view of repository state
pub trait Repository {
    /// Current HEAD
    fn head(&self) -> Result<HeadInfo>;

    /// Names of tags whose target commit is `commit`
    fn tags_at(&self, commit: &str) -> Result<Vec<String>>;

    /// Walk history from HEAD to the nearest tag matching `options.tag_pattern`.
    ///
    /// # Returns
    /// * `Ok(None)` - HEAD has no commits
    /// * `Ok(Some(Describe { tag: None, .. }))` - no eligible tag; distance is
    ///   the number of commits walked
    fn describe(&self, options: &DescribeOptions) -> Result<Option<Describe>>;

    /// Whether the working tree has uncommitted or untracked changes
    fn is_dirty(&self) -> Result<bool>;
}

/// Pick one tag out of several on the same commit: highest version, then name.
///
/// Tags with equal numeric parts are ordered by semver precedence, so a
/// release outranks its pre-releases.
pub fn preferred_tag<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().max_by_key(|name| {
        let stripped = name.strip_prefix(['v', 'V']).unwrap_or(name);
        (
            TagVersion::parse(name),
            semver::Version::parse(stripped).ok(),
            *name,
        )
    })
}

/// Capture a snapshot of `repo`.
///
/// A branch checkout yields a BRANCH ref. A detached HEAD yields a TAG ref
/// when a tag accepted by one of the tag rules in `rules` points at it, and a
/// COMMIT ref otherwise.
pub fn capture_snapshot<R: Repository>(
    repo: &R,
    options: &DescribeOptions,
    rules: &RuleSet,
) -> Result<RefSnapshot> {
    let head = repo.head()?;
    let commit = head
        .commit
        .clone()
        .unwrap_or_else(|| NULL_COMMIT_HASH.to_string());

    let (ref_type, ref_name) = match (&head.branch, &head.commit) {
        (Some(branch), _) => (RefType::Branch, branch.clone()),
        (None, Some(hash)) => {
            let tags = repo.tags_at(hash)?;
            let accepted = tags.iter().map(String::as_str).filter(|t| rules.accepts_tag(t));
            match preferred_tag(accepted) {
                Some(tag) => (RefType::Tag, tag.to_string()),
                None => (RefType::Commit, String::new()),
            }
        }
        (None, None) => (RefType::Commit, String::new()),
    };

    let mut builder = RefSnapshot::builder(ref_type, commit)
        .ref_name(ref_name)
        .dirty(repo.is_dirty()?);

    if let Some(describe) = repo.describe(options)? {
        if let Some(tag) = describe.tag {
            builder = builder.describe_tag(tag);
        }
        builder = builder.distance(describe.distance);
    }

    let snapshot = builder.build()?;
    debug!(
        ref_type = %snapshot.ref_type(),
        ref_name = snapshot.ref_name(),
        commit = snapshot.commit_hash_short(),
        describe_tag = ?snapshot.describe_tag(),
        distance = snapshot.distance(),
        dirty = snapshot.is_dirty(),
        "captured snapshot"
    );
    Ok(snapshot)
}
