//! Composition of checked files into an [`OutputDocument`].

pub mod language;

pub use language::LanguageTable;

use crate::domain::{BlockBody, FileBlock, Identity, OutputDocument};
use crate::error::FileReadError;
use crate::fs::FileSystem;
use crate::selection::SelectionStore;
use crate::utils::decode_text;

/// Read every checked file, in path order, into a document rooted at `root`.
///
/// A file that cannot be read or decoded becomes an error block; composition
/// always runs to the end of the selection.
pub fn compose<F: FileSystem + ?Sized>(
    fs: &F,
    selection: &SelectionStore,
    root: Option<&Identity>,
    languages: &LanguageTable,
) -> OutputDocument {
    let Some(root) = root else {
        return OutputDocument::NoDirectory;
    };

    let root_name = root
        .as_path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.to_string());

    let mut blocks = Vec::with_capacity(selection.checked_count());
    for id in selection.checked() {
        let relative_path = id.relative_to(root).unwrap_or_else(|| id.to_string());
        let language = languages.language_for(&relative_path).to_string();
        let body = match read_text(fs, id) {
            Ok(text) => BlockBody::Content(text),
            Err(e) => {
                tracing::warn!("Error reading {}: {}", relative_path, e);
                BlockBody::Error(e.to_string())
            }
        };
        blocks.push(FileBlock { relative_path, language, body });
    }

    tracing::debug!("Composed {} blocks for {}", blocks.len(), root_name);
    OutputDocument::Composed { root_name, blocks }
}

fn read_text<F: FileSystem + ?Sized>(fs: &F, id: &Identity) -> Result<String, FileReadError> {
    let bytes = fs.read(id.as_path())?;
    decode_text(&bytes)
}
