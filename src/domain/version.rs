use crate::error::{GitVersioningError, Result};
use std::fmt;

/// A resolved version string, guaranteed non-empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Emit the rendered output of `template` as a version.
    ///
    /// The string is kept exactly as rendered; only emptiness is rejected.
    pub fn emit(rendered: String, template: &str) -> Result<Self> {
        if rendered.is_empty() {
            return Err(GitVersioningError::EmptyVersion {
                template: template.to_string(),
            });
        }
        Ok(Version(rendered))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Parse as a semantic version, for callers that require one
    pub fn to_semver(&self) -> std::result::Result<semver::Version, semver::Error> {
        semver::Version::parse(&self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
