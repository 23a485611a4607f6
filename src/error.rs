use thiserror::Error;

/// Unified error type for version resolution
#[derive(Error, Debug)]
pub enum GitVersioningError {
    #[error("No rule matches {ref_type} ref '{ref_name}'")]
    NoMatchingRule { ref_type: String, ref_name: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Unresolved placeholder '${{{placeholder}}}' in template '{template}'")]
    UnresolvedPlaceholder {
        placeholder: String,
        template: String,
    },

    #[error("Template '{template}' rendered an empty version")]
    EmptyVersion { template: String },

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-versioning
pub type Result<T> = std::result::Result<T, GitVersioningError>;

impl GitVersioningError {
    /// Create a pattern configuration error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        GitVersioningError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create a template syntax error
    pub fn invalid_template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        GitVersioningError::InvalidTemplate {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Create a snapshot error with context
    pub fn snapshot(msg: impl Into<String>) -> Self {
        GitVersioningError::Snapshot(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitVersioningError::Config(msg.into())
    }
}
