//! Visible tree construction.
//!
//! The walk is iterative: directories are kept in an arena with parent links
//! and a pending stack instead of native recursion, so deep trees cannot blow
//! the stack. Symlinked directories are followed, but a directory whose
//! resolved path already appears among its ancestors is kept as a leaf.

use std::path::{Path, PathBuf};

use crate::domain::{Entry, EntryKind, Identity, Node};
use crate::error::DirectoryUnreadableError;
use crate::filter::VisibilityFilter;
use crate::fs::FileSystem;

pub struct TreeBuilder<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    filter: &'a VisibilityFilter,
}

struct Slot {
    entry: Entry,
    parent: Option<usize>,
    /// Fully resolved path, used for cycle detection on directories.
    resolved: Option<PathBuf>,
    children: Vec<usize>,
    load_error: Option<String>,
}

impl Slot {
    fn new(entry: Entry, parent: Option<usize>, resolved: Option<PathBuf>) -> Self {
        Self { entry, parent, resolved, children: Vec::new(), load_error: None }
    }
}

impl<'a, F: FileSystem + ?Sized> TreeBuilder<'a, F> {
    pub fn new(fs: &'a F, filter: &'a VisibilityFilter) -> Self {
        Self { fs, filter }
    }

    /// Build the visible hierarchy under `root`.
    ///
    /// Never fails: a directory that cannot be listed becomes an empty node
    /// carrying the error message.
    pub fn build(&self, root: &Identity) -> Node {
        let root_name = root
            .as_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string());
        let resolved_root = self.fs.canonicalize(root.as_path()).ok();
        let root_entry = Entry::new(root.clone(), EntryKind::Directory, root_name);
        let mut arena = vec![Slot::new(root_entry.clone(), None, resolved_root)];
        let mut pending = vec![0usize];

        while let Some(idx) = pending.pop() {
            let dir_id = arena[idx].entry.identity().clone();
            let listing = match self.fs.list_dir(dir_id.as_path()) {
                Ok(listing) => listing,
                Err(source) => {
                    let err =
                        DirectoryUnreadableError { path: dir_id.as_path().to_path_buf(), source };
                    tracing::warn!("{}", err);
                    arena[idx].load_error = Some(err.to_string());
                    continue;
                }
            };

            let mut visible: Vec<_> = listing
                .into_iter()
                .filter(|item| {
                    let name = item.name.to_string_lossy();
                    let is_dir = item.kind == EntryKind::Directory;
                    self.filter.is_visible(dir_id.as_path(), &name, is_dir)
                })
                .collect();
            visible.sort_by(|a, b| a.name.cmp(&b.name));

            for item in visible {
                let identity = dir_id.join(&item.name);
                let name = item.name.to_string_lossy().into_owned();
                let entry = Entry::new(identity, item.kind, name);
                let child = arena.len();

                if item.kind == EntryKind::File {
                    arena.push(Slot::new(entry, Some(idx), None));
                    arena[idx].children.push(child);
                    continue;
                }

                let mut slot = Slot::new(entry, Some(idx), None);
                match self.fs.canonicalize(slot.entry.identity().as_path()) {
                    Ok(resolved) if on_current_path(&arena, idx, &resolved) => {
                        tracing::warn!(
                            "Not descending into {}: symbolic link cycle back to {}",
                            slot.entry.identity(),
                            resolved.display()
                        );
                        slot.load_error =
                            Some(format!("symbolic link cycle back to {}", resolved.display()));
                    }
                    Ok(resolved) => {
                        slot.resolved = Some(resolved);
                        pending.push(child);
                    }
                    Err(source) => {
                        let err = DirectoryUnreadableError {
                            path: slot.entry.identity().as_path().to_path_buf(),
                            source,
                        };
                        tracing::warn!("{}", err);
                        slot.load_error = Some(err.to_string());
                    }
                }
                arena.push(slot);
                arena[idx].children.push(child);
            }
        }

        tracing::debug!("Built tree for {} with {} entries", root, arena.len());
        assemble(arena).unwrap_or_else(|| Node::new(root_entry, Vec::new()))
    }
}

/// Whether `resolved` is the resolved path of `idx` or any of its ancestors.
fn on_current_path(arena: &[Slot], idx: usize, resolved: &Path) -> bool {
    let mut current = Some(idx);
    while let Some(i) = current {
        if arena[i].resolved.as_deref() == Some(resolved) {
            return true;
        }
        current = arena[i].parent;
    }
    false
}

/// Turn the arena into nested nodes. Children always sit after their parent,
/// so consuming the arena from the back sees every child before its parent.
fn assemble(mut arena: Vec<Slot>) -> Option<Node> {
    let mut built: Vec<Option<Node>> = Vec::with_capacity(arena.len());
    built.resize_with(arena.len(), || None);

    while let Some(slot) = arena.pop() {
        let idx = arena.len();
        let children = slot.children.iter().filter_map(|&c| built[c].take()).collect();
        let mut node = Node::new(slot.entry, children);
        node.load_error = slot.load_error;
        built[idx] = Some(node);
    }

    built.into_iter().next().flatten()
}
