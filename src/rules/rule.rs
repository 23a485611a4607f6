use crate::domain::{RefSnapshot, RefType};
use crate::error::{GitVersioningError, Result};
use crate::template::{CapturedVars, Template, TAG_VERSION_VAR};
use regex::Regex;
use std::fmt;

/// A full-string regular expression over ref names
#[derive(Debug, Clone)]
pub struct RefPattern {
    source: String,
    regex: Regex,
}

impl RefPattern {
    /// Compile `source` anchored at both ends
    pub fn compile(source: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", source))
            .map_err(|e| GitVersioningError::invalid_pattern(source, e.to_string()))?;
        Ok(RefPattern {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of explicit capture groups
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl PartialEq for RefPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for RefPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Matches tags; the single capture group becomes `ref.tagVersion`
#[derive(Debug, Clone, PartialEq)]
pub struct TagRule {
    pub pattern: RefPattern,
    pub template: Template,
}

impl TagRule {
    pub fn new(pattern: &str, template: &str) -> Result<Self> {
        let pattern = RefPattern::compile(pattern)?;
        if pattern.group_count() != 1 {
            return Err(GitVersioningError::invalid_pattern(
                pattern.as_str(),
                format!(
                    "tag pattern must declare exactly one capture group, found {}",
                    pattern.group_count()
                ),
            ));
        }
        if let Some(name) = pattern.regex.capture_names().flatten().next() {
            if name != TAG_VERSION_VAR {
                return Err(GitVersioningError::invalid_pattern(
                    pattern.as_str(),
                    format!(
                        "capture group must be named '{}' or left unnamed, found '{}'",
                        TAG_VERSION_VAR, name
                    ),
                ));
            }
        }

        Ok(TagRule {
            pattern,
            template: Template::parse(template)?,
        })
    }

    fn capture(&self, ref_name: &str) -> Option<CapturedVars> {
        let caps = self.pattern.regex.captures(ref_name)?;
        let mut vars = CapturedVars::new();
        // An optional group that did not participate leaves the variable unset.
        if let Some(m) = caps.get(1) {
            vars.insert(TAG_VERSION_VAR.to_string(), m.as_str().to_string());
        }
        Some(vars)
    }
}

/// Matches branches by full name
#[derive(Debug, Clone, PartialEq)]
pub struct BranchRule {
    pub pattern: RefPattern,
    pub template: Template,
}

impl BranchRule {
    pub fn new(pattern: &str, template: &str) -> Result<Self> {
        Ok(BranchRule {
            pattern: RefPattern::compile(pattern)?,
            template: Template::parse(template)?,
        })
    }
}

/// Fallback for detached commits
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRule {
    pub template: Template,
}

impl CommitRule {
    pub fn new(template: &str) -> Result<Self> {
        Ok(CommitRule {
            template: Template::parse(template)?,
        })
    }
}

/// One entry of a rule set
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Tag(TagRule),
    Branch(BranchRule),
    Commit(CommitRule),
}

impl Rule {
    pub fn tag(pattern: &str, template: &str) -> Result<Self> {
        TagRule::new(pattern, template).map(Rule::Tag)
    }

    pub fn branch(pattern: &str, template: &str) -> Result<Self> {
        BranchRule::new(pattern, template).map(Rule::Branch)
    }

    pub fn commit(template: &str) -> Result<Self> {
        CommitRule::new(template).map(Rule::Commit)
    }

    /// Ref type this rule applies to
    pub fn ref_type(&self) -> RefType {
        match self {
            Rule::Tag(_) => RefType::Tag,
            Rule::Branch(_) => RefType::Branch,
            Rule::Commit(_) => RefType::Commit,
        }
    }

    pub fn pattern(&self) -> Option<&RefPattern> {
        match self {
            Rule::Tag(rule) => Some(&rule.pattern),
            Rule::Branch(rule) => Some(&rule.pattern),
            Rule::Commit(_) => None,
        }
    }

    pub fn template(&self) -> &Template {
        match self {
            Rule::Tag(rule) => &rule.template,
            Rule::Branch(rule) => &rule.template,
            Rule::Commit(rule) => &rule.template,
        }
    }

    /// Test the rule against a snapshot, returning captured variables on a match
    pub fn matches(&self, snapshot: &RefSnapshot) -> Option<CapturedVars> {
        match (self, snapshot.ref_type()) {
            (Rule::Tag(rule), RefType::Tag) => rule.capture(snapshot.ref_name()),
            (Rule::Branch(rule), RefType::Branch) => rule
                .pattern
                .is_match(snapshot.ref_name())
                .then(CapturedVars::new),
            (Rule::Commit(_), RefType::Commit) => Some(CapturedVars::new()),
            _ => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pattern() {
            Some(pattern) => write!(f, "{}({}) -> {}", self.ref_type(), pattern, self.template()),
            None => write!(f, "{} -> {}", self.ref_type(), self.template()),
        }
    }
}
