//! Checked files and expanded folders, keyed by identity.
//!
//! The store is the only state that outlives a tree rebuild. A refresh takes a
//! [`SelectionState`] snapshot, rebuilds the tree, and restores the snapshot
//! against the new tree; identities the new tree no longer contains are dropped.

use std::collections::BTreeSet;

use crate::domain::{Entry, Identity, Node};
use crate::error::SelectionError;
use crate::fs::FileSystem;

/// Captured selection, carried across a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub checked: BTreeSet<Identity>,
    pub expanded: BTreeSet<Identity>,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    checked: BTreeSet<Identity>,
    expanded: BTreeSet<Identity>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the checked state of a file and return the new state.
    pub fn toggle_checked(&mut self, entry: &Entry) -> Result<bool, SelectionError> {
        if !entry.is_file() {
            return Err(SelectionError::NotAFile(entry.identity().clone()));
        }
        let id = entry.identity();
        if self.checked.remove(id) {
            Ok(false)
        } else {
            self.checked.insert(id.clone());
            Ok(true)
        }
    }

    /// Mark a file checked regardless of its current state.
    pub fn check(&mut self, entry: &Entry) -> Result<(), SelectionError> {
        if !entry.is_file() {
            return Err(SelectionError::NotAFile(entry.identity().clone()));
        }
        self.checked.insert(entry.identity().clone());
        Ok(())
    }

    pub fn set_expanded(&mut self, entry: &Entry, expanded: bool) -> Result<(), SelectionError> {
        if !entry.is_dir() {
            return Err(SelectionError::NotADirectory(entry.identity().clone()));
        }
        if expanded {
            self.expanded.insert(entry.identity().clone());
        } else {
            self.expanded.remove(entry.identity());
        }
        Ok(())
    }

    pub fn is_checked(&self, id: &Identity) -> bool {
        self.checked.contains(id)
    }

    pub fn is_expanded(&self, id: &Identity) -> bool {
        self.expanded.contains(id)
    }

    /// Checked identities in path order.
    pub fn checked(&self) -> impl Iterator<Item = &Identity> {
        self.checked.iter()
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    /// Capture the current state. Checked files that no longer exist are left out.
    pub fn snapshot<F: FileSystem + ?Sized>(&self, fs: &F) -> SelectionState {
        let checked: BTreeSet<Identity> =
            self.checked.iter().filter(|id| fs.exists(id.as_path())).cloned().collect();
        if checked.len() != self.checked.len() {
            tracing::debug!(
                "Snapshot dropped {} checked files missing from disk",
                self.checked.len() - checked.len()
            );
        }
        SelectionState { checked, expanded: self.expanded.clone() }
    }

    /// Replace the current state with `state`, keeping only identities that
    /// `new_root` contains with the right kind.
    pub fn restore(&mut self, state: SelectionState, new_root: &Node) {
        self.checked.clear();
        self.expanded.clear();

        let wanted = state.checked.len() + state.expanded.len();
        for node in new_root.iter() {
            let id = node.identity();
            if node.is_file() && state.checked.contains(id) {
                self.checked.insert(id.clone());
            } else if node.is_dir() && state.expanded.contains(id) {
                self.expanded.insert(id.clone());
            }
        }

        let kept = self.checked.len() + self.expanded.len();
        if kept < wanted {
            tracing::debug!(
                "Restore dropped {} identities absent from the new tree",
                wanted - kept
            );
        }
    }

    pub fn clear(&mut self) {
        self.checked.clear();
        self.expanded.clear();
    }

    /// Copy expansion state onto the tree's view flags.
    pub fn apply_expansion(&self, root: &mut Node) {
        root.for_each_mut(|node| {
            node.expanded = node.is_dir() && self.expanded.contains(node.identity());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryKind;
    use crate::fs::OsFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn file(id: &Identity) -> Entry {
        Entry::new(id.clone(), EntryKind::File, "f")
    }

    fn dir_node(id: Identity, name: &str, children: Vec<Node>) -> Node {
        Node::new(Entry::new(id, EntryKind::Directory, name), children)
    }

    fn file_node(id: Identity) -> Node {
        Node::new(file(&id), Vec::new())
    }

    #[test]
    fn test_toggle_flips_files_only() {
        let mut store = SelectionStore::new();
        let id = Identity::new("/r/a.txt");
        assert_eq!(store.toggle_checked(&file(&id)), Ok(true));
        assert!(store.is_checked(&id));
        assert_eq!(store.toggle_checked(&file(&id)), Ok(false));
        assert!(!store.is_checked(&id));

        let dir = Entry::new(Identity::new("/r/d"), EntryKind::Directory, "d");
        assert!(matches!(store.toggle_checked(&dir), Err(SelectionError::NotAFile(_))));
        assert_eq!(store.checked_count(), 0);
    }

    #[test]
    fn test_checked_iterates_in_path_order() {
        let mut store = SelectionStore::new();
        for p in ["/r/y.txt", "/r/a/b.py", "/r/x.py"] {
            store.check(&file(&Identity::new(p))).expect("check");
        }
        let order: Vec<String> = store.checked().map(|id| id.to_string()).collect();
        assert_eq!(order, vec!["/r/a/b.py", "/r/x.py", "/r/y.txt"]);
    }

    #[test]
    fn test_snapshot_prunes_deleted_files() {
        let tmp = TempDir::new().expect("tmp");
        let kept = Identity::new(tmp.path().join("keep.txt"));
        let gone = Identity::new(tmp.path().join("a").join("b.txt"));
        fs::write(kept.as_path(), "k").expect("write");
        fs::create_dir(tmp.path().join("a")).expect("mkdir");
        fs::write(gone.as_path(), "g").expect("write");

        let mut store = SelectionStore::new();
        store.check(&file(&kept)).expect("check");
        store.check(&file(&gone)).expect("check");
        fs::remove_file(gone.as_path()).expect("remove");

        let snap = store.snapshot(&OsFileSystem);
        assert!(snap.checked.contains(&kept));
        assert!(!snap.checked.contains(&gone));
    }

    #[test]
    fn test_restore_drops_identities_missing_from_tree() {
        let root = Identity::new("/r");
        let present = root.join("a.txt");
        let hidden = root.join(".secret");
        let state = SelectionState {
            checked: [present.clone(), hidden.clone()].into_iter().collect(),
            expanded: BTreeSet::new(),
        };
        let tree = dir_node(root.clone(), "r", vec![file_node(present.clone())]);

        let mut store = SelectionStore::new();
        store.restore(state, &tree);
        assert!(store.is_checked(&present));
        assert!(!store.is_checked(&hidden));
        assert_eq!(store.checked_count(), 1);
    }

    #[test]
    fn test_restore_ignores_kind_mismatch() {
        let root = Identity::new("/r");
        let id = root.join("thing");
        let state = SelectionState {
            checked: [id.clone()].into_iter().collect(),
            expanded: BTreeSet::new(),
        };
        // `thing` turned from a file into a directory between builds.
        let tree = dir_node(root.clone(), "r", vec![dir_node(id.clone(), "thing", Vec::new())]);

        let mut store = SelectionStore::new();
        store.restore(state, &tree);
        assert!(!store.is_checked(&id));
    }

    #[test]
    fn test_expansion_is_keyed_by_path_not_name() {
        let root = Identity::new("/r");
        let first_src = root.join("app").join("src");
        let second_src = root.join("lib").join("src");
        let mut tree = dir_node(
            root.clone(),
            "r",
            vec![
                dir_node(
                    root.join("app"),
                    "app",
                    vec![dir_node(first_src.clone(), "src", Vec::new())],
                ),
                dir_node(
                    root.join("lib"),
                    "lib",
                    vec![dir_node(second_src.clone(), "src", Vec::new())],
                ),
            ],
        );

        let mut store = SelectionStore::new();
        let entry = tree.find(&first_src).expect("node").entry.clone();
        store.set_expanded(&entry, true).expect("expand");

        let snap = store.snapshot(&OsFileSystem);
        store.restore(snap, &tree);
        store.apply_expansion(&mut tree);

        assert!(tree.find(&first_src).expect("first").expanded);
        assert!(!tree.find(&second_src).expect("second").expanded);
    }

    #[test]
    fn test_set_expanded_rejects_files() {
        let mut store = SelectionStore::new();
        let id = Identity::new("/r/a.txt");
        assert_eq!(store.set_expanded(&file(&id), true), Err(SelectionError::NotADirectory(id)));
    }

    #[test]
    fn test_clear_empties_both_sets() {
        let mut store = SelectionStore::new();
        store.check(&file(&Identity::new("/r/a"))).expect("check");
        let dir = Entry::new(Identity::new("/r/d"), EntryKind::Directory, "d");
        store.set_expanded(&dir, true).expect("expand");
        store.clear();
        assert_eq!(store.checked_count(), 0);
        assert!(!store.is_expanded(dir.identity()));
    }
}
