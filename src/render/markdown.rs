//! Markdown rendering: one fenced block per file.

use crate::domain::{BlockBody, OutputDocument};

/// Line emitted when no root directory has been chosen.
pub const NO_DIRECTORY_LINE: &str = "No directory selected.\n";

pub fn render_markdown(doc: &OutputDocument) -> String {
    let (root_name, blocks) = match doc {
        OutputDocument::NoDirectory => return NO_DIRECTORY_LINE.to_string(),
        OutputDocument::Composed { root_name, blocks } => (root_name, blocks),
    };

    let mut out = String::new();
    for block in blocks {
        match &block.body {
            BlockBody::Content(text) => {
                out.push_str(&format!("```{}\n", block.language));
                out.push_str(&format!("# {}/{}\n", root_name, block.relative_path));
                out.push_str(text);
                out.push_str("\n```\n\n");
            }
            BlockBody::Error(reason) => {
                out.push_str(&format!("Error reading {}: {}\n\n", block.relative_path, reason));
            }
        }
    }
    out
}
