//! Domain model - pure data independent of git operations

pub mod snapshot;
pub mod tag;
pub mod version;

pub use snapshot::{Channel, RefSnapshot, RefSnapshotBuilder, RefType};
pub use tag::TagVersion;
pub use version::Version;
