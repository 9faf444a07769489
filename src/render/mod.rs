//! Output rendering (Markdown document, JSON document, tree view)

pub mod json;
pub mod markdown;
pub mod tree;

pub use json::render_json;
pub use markdown::render_markdown;
pub use tree::{render_tree, status_line};
