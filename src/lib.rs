//! fileweave: pick files from a directory tree and weave them into one document
//!
//! The library holds the filtered tree model and the selection engine: ignore
//! rules and hidden-file policy decide what is visible, the tree builder turns
//! the visible entries into an ordered hierarchy, the selection store carries
//! checked files and expanded folders across rebuilds, and the composer turns
//! the checked files into an annotated, language-tagged document.

pub mod cli;
pub mod compose;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod fs;
pub mod render;
pub mod scan;
pub mod selection;
pub mod utils;
pub mod workspace;

pub use compose::{compose, LanguageTable};
pub use domain::{BlockBody, Entry, EntryKind, FileBlock, Identity, Node, OutputDocument, Policy};
pub use error::{
    DirectoryUnreadableError, FileReadError, MalformedPatternError, RootError, SelectionError,
};
pub use fs::{FileSystem, OsFileSystem};
pub use selection::{SelectionState, SelectionStore};
pub use workspace::{RootHandle, Workspace};
