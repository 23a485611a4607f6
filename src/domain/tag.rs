use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Numeric version carried by a tag name (e.g. "v1.4" -> 1.4.0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

fn numeric_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("static version regex is valid")
    })
}

impl TagVersion {
    /// Create a new tag version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        TagVersion {
            major,
            minor,
            patch,
        }
    }

    /// Extract the first `major[.minor[.patch]]` run out of a tag name.
    ///
    /// Missing components default to 0. Returns `None` when the name holds no
    /// digits at all, or when a component does not fit in a `u64`.
    pub fn parse(tag: &str) -> Option<Self> {
        let caps = numeric_version_regex().captures(tag)?;
        let component = |i: usize| -> Option<u64> {
            match caps.get(i) {
                Some(m) => m.as_str().parse::<u64>().ok(),
                None => Some(0),
            }
        };

        Some(TagVersion {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
        })
    }

    /// The next unreleased minor number
    pub fn next_minor(&self) -> u64 {
        self.minor.saturating_add(1)
    }
}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_version() {
        assert_eq!(TagVersion::parse("v1.2.3"), Some(TagVersion::new(1, 2, 3)));
    }

    #[test]
    fn test_parse_defaults_missing_components() {
        assert_eq!(TagVersion::parse("v2"), Some(TagVersion::new(2, 0, 0)));
        assert_eq!(TagVersion::parse("release-1.4"), Some(TagVersion::new(1, 4, 0)));
    }

    #[test]
    fn test_parse_ignores_suffix() {
        assert_eq!(
            TagVersion::parse("v1.4.0-rc.2"),
            Some(TagVersion::new(1, 4, 0))
        );
    }

    #[test]
    fn test_parse_without_digits() {
        assert_eq!(TagVersion::parse("stable"), None);
    }

    #[test]
    fn test_next_minor() {
        assert_eq!(TagVersion::new(1, 4, 0).next_minor(), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(TagVersion::new(0, 10, 7).to_string(), "0.10.7");
    }
}
