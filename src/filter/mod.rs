//! Entry visibility: ignore-file rules plus hidden-file policy.

pub mod pattern;
pub mod visibility;

pub use pattern::{IgnoreRule, IgnoreSpec, IGNORE_FILE_NAME};
pub use visibility::VisibilityFilter;
