//! Error taxonomy.
//!
//! Only [`RootError`] and [`SelectionError`] reach callers. The other errors
//! are logged and absorbed where they occur: an unreadable directory becomes an
//! empty subtree, an unreadable file becomes an error block, and a malformed
//! ignore line is skipped.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Identity;

#[derive(Error, Debug)]
pub enum RootError {
    #[error("Path does not exist: {0}")]
    Missing(PathBuf),
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Cannot read directory {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No directory selected")]
    NotSet,
}

#[derive(Error, Debug)]
#[error("Cannot list directory {path}: {source}")]
pub struct DirectoryUnreadableError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Error, Debug)]
pub enum FileReadError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("content is not valid {encoding} text")]
    Decode { encoding: &'static str },
}

#[derive(Error, Debug)]
#[error("Skipping ignore pattern on line {line_number} ({line:?}): {source}")]
pub struct MalformedPatternError {
    pub line_number: usize,
    pub line: String,
    #[source]
    pub source: ignore::Error,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Not in the current tree: {0}")]
    UnknownEntry(Identity),
    #[error("Only files can be checked: {0}")]
    NotAFile(Identity),
    #[error("Only directories can be expanded: {0}")]
    NotADirectory(Identity),
}
