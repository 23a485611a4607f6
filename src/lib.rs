pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod resolver;
pub mod rules;
pub mod template;
pub mod ui;

pub use domain::{Channel, RefSnapshot, RefType, Version};
pub use error::{GitVersioningError, Result};
pub use resolver::VersionResolver;
