use crate::domain::RefType;
use crate::error::{GitVersioningError, Result};
use crate::git::DescribeOptions;
use crate::resolver::VersionResolver;
use crate::rules::{RefPattern, Rule, RuleSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project-local configuration file
pub const CONFIG_FILE_NAME: &str = "gitversioning.toml";

/// Represents the complete configuration for git-versioning.
///
/// Contains the ordered ref rules, the detached-commit fallback and the
/// settings that shape snapshot capture.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Appended by `${dirty}` when the working tree has modifications
    #[serde(default)]
    pub dirty_marker: String,

    /// Only follow first parents when looking for the describe tag
    #[serde(default)]
    pub describe_tag_first_parent: bool,

    /// Tags eligible as describe tags (full-string match)
    #[serde(default = "default_describe_tag_pattern")]
    pub describe_tag_pattern: String,

    #[serde(default)]
    pub refs: Vec<RefRuleConfig>,

    #[serde(default)]
    pub rev: Option<RevConfig>,
}

/// One `[[refs]]` entry.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RefRuleConfig {
    #[serde(rename = "type")]
    pub ref_type: RefType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    pub version: String,
}

/// The `[rev]` table: version for detached commits, evaluated last.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RevConfig {
    pub version: String,
}

fn default_describe_tag_pattern() -> String {
    ".*".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dirty_marker: "-dirty".to_string(),
            describe_tag_first_parent: false,
            describe_tag_pattern: default_describe_tag_pattern(),
            refs: vec![
                RefRuleConfig {
                    ref_type: RefType::Tag,
                    pattern: Some("v(?<tagVersion>[0-9].*)".to_string()),
                    version: "${ref.tagVersion}${dirty}".to_string(),
                },
                RefRuleConfig {
                    ref_type: RefType::Branch,
                    pattern: Some("develop".to_string()),
                    version: "${describe.tag.version.major}.${describe.tag.version.minor.next}.0.${describe.distance}-SNAPSHOT${dirty}"
                        .to_string(),
                },
                RefRuleConfig {
                    ref_type: RefType::Branch,
                    pattern: Some(".+".to_string()),
                    version: "${ref}-${commit.short}${dirty}".to_string(),
                },
            ],
            rev: Some(RevConfig {
                version: "${commit.short}${dirty}".to_string(),
            }),
        }
    }
}

impl Config {
    /// Compile every rule in declared order, `[rev]` last.
    ///
    /// Pattern and template mistakes surface here, before any resolution.
    pub fn rule_set(&self) -> Result<RuleSet> {
        if self.refs.is_empty() && self.rev.is_none() {
            return Err(GitVersioningError::config("no version rules configured"));
        }

        let mut rules = Vec::with_capacity(self.refs.len() + 1);
        for entry in &self.refs {
            rules.push(entry.compile()?);
        }
        if let Some(rev) = &self.rev {
            rules.push(Rule::commit(&rev.version)?);
        }

        Ok(RuleSet::new(rules))
    }

    /// Build the resolver for this configuration
    pub fn resolver(&self) -> Result<VersionResolver> {
        Ok(VersionResolver::new(self.rule_set()?, self.dirty_marker.clone()))
    }

    pub fn describe_options(&self) -> Result<DescribeOptions> {
        Ok(DescribeOptions {
            first_parent: self.describe_tag_first_parent,
            tag_pattern: RefPattern::compile(&self.describe_tag_pattern)?,
        })
    }
}

impl RefRuleConfig {
    fn compile(&self) -> Result<Rule> {
        match (self.ref_type, self.pattern.as_deref()) {
            (RefType::Tag, Some(pattern)) => Rule::tag(pattern, &self.version),
            (RefType::Branch, Some(pattern)) => Rule::branch(pattern, &self.version),
            (RefType::Commit, None) => Rule::commit(&self.version),
            (RefType::Commit, Some(pattern)) => Err(GitVersioningError::invalid_pattern(
                pattern,
                "commit rules do not take a pattern",
            )),
            (ref_type, None) => Err(GitVersioningError::invalid_pattern(
                "",
                format!("{} rule for '{}' requires a pattern", ref_type, self.version),
            )),
        }
    }
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| GitVersioningError::config(e.to_string()))
}

/// Returns the path of the configuration file that `load_config` would read.
pub fn find_config_file(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitversioning.toml` in current directory
/// 3. `.gitversioning.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    match find_config_file(config_path) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            parse_config(&content).map_err(|e| {
                GitVersioningError::config(format!("{}: {}", path.display(), e))
            })
        }
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_compiles() {
        let rules = Config::default().rule_set().unwrap();
        assert_eq!(rules.len(), 4);
        assert_eq!(rules.rules()[3].ref_type(), RefType::Commit);
    }

    #[test]
    fn test_parse_minimal() {
        let config = parse_config(
            r#"
[rev]
version = "${commit.short}"
"#,
        )
        .unwrap();
        assert_eq!(config.dirty_marker, "");
        assert_eq!(config.describe_tag_pattern, ".*");
        assert!(!config.describe_tag_first_parent);
        assert_eq!(config.rule_set().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_config_is_rejected() {
        let config = parse_config("dirty_marker = \"+dirty\"").unwrap();
        assert!(config.rule_set().is_err());
    }

    #[test]
    fn test_pattern_requirements() {
        let config = parse_config(
            r#"
[[refs]]
type = "branch"
version = "${ref}"
"#,
        )
        .unwrap();
        let err = config.rule_set().unwrap_err();
        assert!(matches!(err, GitVersioningError::InvalidPattern { .. }));

        let config = parse_config(
            r#"
[[refs]]
type = "commit"
pattern = "main"
version = "${commit}"
"#,
        )
        .unwrap();
        assert!(config.rule_set().is_err());
    }

    #[test]
    fn test_unknown_ref_type_is_a_parse_error() {
        let result = parse_config(
            r#"
[[refs]]
type = "remote"
pattern = "origin"
version = "${ref}"
"#,
        );
        assert!(matches!(result, Err(GitVersioningError::Config(_))));
    }

    #[test]
    fn test_describe_options() {
        let mut config = Config::default();
        config.describe_tag_first_parent = true;
        config.describe_tag_pattern = "v.+".to_string();
        let options = config.describe_options().unwrap();
        assert!(options.first_parent);
        assert!(options.tag_pattern.is_match("v1.0"));
        assert!(!options.tag_pattern.is_match("nightly"));
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string(&Config::default()).unwrap();
        assert_eq!(parse_config(&text).unwrap(), Config::default());
    }
}
