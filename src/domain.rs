//! Core data model: entries, nodes, policies and the composed document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::utils::normalize_path;

/// Stable key for an entry: the canonical root joined with the entry's name components.
///
/// Identities never resolve symlinks below the root, so every node of one
/// build carries a distinct identity even when two links share a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identity(PathBuf);

impl Identity {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Identity of a child entry named `name`.
    pub fn join(&self, name: impl AsRef<Path>) -> Self {
        Self(self.0.join(name))
    }

    /// Slash-separated path of `self` relative to `root`, or `None` when it lies outside.
    pub fn relative_to(&self, root: &Identity) -> Option<String> {
        let rel = self.0.strip_prefix(&root.0).ok()?;
        Some(normalize_path(rel))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

/// A filesystem path with its kind and display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    identity: Identity,
    kind: EntryKind,
    name: String,
}

impl Entry {
    pub fn new(identity: Identity, kind: EntryKind, name: impl Into<String>) -> Self {
        Self { identity, kind, name: name.into() }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// One element of the visible tree.
///
/// Children are sorted by name in ordinal order, files and directories interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub entry: Entry,
    pub children: Vec<Node>,
    pub expanded: bool,
    /// Set when the directory could not be listed; its children are then empty.
    pub load_error: Option<String>,
}

impl Node {
    pub fn new(entry: Entry, children: Vec<Node>) -> Self {
        Self { entry, children, expanded: false, load_error: None }
    }

    pub fn identity(&self) -> &Identity {
        self.entry.identity()
    }

    pub fn name(&self) -> &str {
        self.entry.name()
    }

    pub fn is_dir(&self) -> bool {
        self.entry.is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.entry.is_file()
    }

    /// Pre-order iterator over this node and all of its descendants.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    pub fn find(&self, identity: &Identity) -> Option<&Node> {
        self.iter().find(|node| node.identity() == identity)
    }

    /// Identities of every file in the hierarchy, in tree order.
    pub fn file_identities(&self) -> Vec<Identity> {
        self.iter().filter(|n| n.is_file()).map(|n| n.identity().clone()).collect()
    }

    /// Apply `f` to this node and every descendant.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut Node)) {
        let mut stack: Vec<&mut Node> = vec![self];
        while let Some(node) = stack.pop() {
            f(node);
            stack.extend(node.children.iter_mut());
        }
    }
}

pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Visibility policy toggled by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub show_hidden: bool,
    pub respect_ignore: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self { show_hidden: false, respect_ignore: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Project configuration, loaded from `fileweave.toml` or `.fileweave.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub show_hidden: bool,
    pub respect_gitignore: bool,
    pub format: OutputFormat,
    /// Extension to language tag entries layered over the built-in table.
    pub languages: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_hidden: false,
            respect_gitignore: true,
            format: OutputFormat::default(),
            languages: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn policy(&self) -> Policy {
        Policy { show_hidden: self.show_hidden, respect_ignore: self.respect_gitignore }
    }
}

/// Content of one file block: the decoded text or the reason it could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum BlockBody {
    Content(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileBlock {
    pub relative_path: String,
    pub language: String,
    pub body: BlockBody,
}

impl FileBlock {
    pub fn is_error(&self) -> bool {
        matches!(self.body, BlockBody::Error(_))
    }
}

/// The composed document, in deterministic path order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutputDocument {
    /// No root directory has been chosen yet.
    NoDirectory,
    Composed { root_name: String, blocks: Vec<FileBlock> },
}

impl OutputDocument {
    pub fn blocks(&self) -> &[FileBlock] {
        match self {
            Self::NoDirectory => &[],
            Self::Composed { blocks, .. } => blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(root: &Identity, rel: &str) -> Node {
        let name = rel.rsplit('/').next().unwrap_or(rel);
        Node::new(Entry::new(root.join(rel), EntryKind::File, name), Vec::new())
    }

    #[test]
    fn test_relative_to_uses_forward_slashes() {
        let root = Identity::new("/work/proj");
        let id = root.join("src").join("main.py");
        assert_eq!(id.relative_to(&root).as_deref(), Some("src/main.py"));
        assert_eq!(Identity::new("/elsewhere").relative_to(&root), None);
    }

    #[test]
    fn test_iter_is_preorder_in_child_order() {
        let root = Identity::new("/r");
        let dir = Node::new(
            Entry::new(root.join("a"), EntryKind::Directory, "a"),
            vec![file(&root, "a/x"), file(&root, "a/y")],
        );
        let tree = Node::new(
            Entry::new(root.clone(), EntryKind::Directory, "r"),
            vec![dir, file(&root, "b")],
        );

        let names: Vec<&str> = tree.iter().map(Node::name).collect();
        assert_eq!(names, vec!["r", "a", "x", "y", "b"]);
        assert_eq!(tree.file_identities().len(), 3);
        assert!(tree.find(&root.join("a/y")).is_some());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::parse("xml"), None);
    }
}
