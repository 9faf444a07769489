//! Directory traversal into the visible tree.

pub mod builder;

pub use builder::TreeBuilder;
