//! Ordered version rules and the first-match-wins matcher.
//!
//! A [`RuleSet`] is evaluated top to bottom; the first rule whose ref type
//! and pattern accept the snapshot is selected. There is no scoring or
//! reordering.

pub mod rule;

pub use rule::{BranchRule, CommitRule, RefPattern, Rule, TagRule};

use crate::domain::RefSnapshot;
use crate::template::CapturedVars;
use tracing::debug;

/// The rule selected for a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch<'a> {
    /// Position of the rule in its set
    pub index: usize,
    pub rule: &'a Rule,
    pub captured: CapturedVars,
}

/// Immutable, ordered list of rules
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleSet { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any tag rule would accept a tag named `name`
    pub fn accepts_tag(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| match rule {
            Rule::Tag(tag) => tag.pattern.is_match(name),
            _ => false,
        })
    }

    /// Select the first rule matching `snapshot`, or `None`
    pub fn find_match(&self, snapshot: &RefSnapshot) -> Option<RuleMatch<'_>> {
        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(captured) = rule.matches(snapshot) {
                debug!(index, rule = %rule, "rule matched");
                return Some(RuleMatch {
                    index,
                    rule,
                    captured,
                });
            }
            debug!(index, rule = %rule, "rule skipped");
        }
        None
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        RuleSet::new(iter.into_iter().collect())
    }
}
