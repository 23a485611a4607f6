//! Version resolution: snapshot -> matched rule -> rendered template -> version.

use crate::domain::{RefSnapshot, Version};
use crate::error::{GitVersioningError, Result};
use crate::rules::RuleSet;
use crate::template::Scope;
use tracing::debug;

/// Resolves versions for snapshots against a fixed rule set.
///
/// Holds no mutable state; one resolver can serve any number of snapshots,
/// from any number of threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionResolver {
    rules: RuleSet,
    dirty_marker: String,
}

impl VersionResolver {
    pub fn new(rules: RuleSet, dirty_marker: impl Into<String>) -> Self {
        VersionResolver {
            rules,
            dirty_marker: dirty_marker.into(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn dirty_marker(&self) -> &str {
        &self.dirty_marker
    }

    /// Resolve the version for `snapshot`.
    ///
    /// # Errors
    /// * `NoMatchingRule` - no rule accepts the snapshot
    /// * `UnresolvedPlaceholder` - the matched template names an unknown value
    /// * `EmptyVersion` - the template rendered to nothing
    pub fn resolve(&self, snapshot: &RefSnapshot) -> Result<Version> {
        let matched = self.rules.find_match(snapshot).ok_or_else(|| {
            GitVersioningError::NoMatchingRule {
                ref_type: snapshot.ref_type().to_string(),
                ref_name: snapshot.ref_name().to_string(),
            }
        })?;

        let template = matched.rule.template();
        let scope = Scope {
            snapshot,
            captured: &matched.captured,
            dirty_marker: &self.dirty_marker,
        };
        let rendered = template.render(&scope)?;
        debug!(rule = matched.index, template = %template, rendered = %rendered, "template rendered");

        Version::emit(rendered, template.as_str())
    }
}
