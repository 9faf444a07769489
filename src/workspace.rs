//! The context object tying root, policy, tree and selection together.
//!
//! A [`Workspace`] owns everything one root selection needs. Changing the root
//! clears the selection; changing the policy only takes effect on the next
//! [`Workspace::rebuild`], which snapshots the selection, rebuilds the tree and
//! restores whatever is still visible.

use std::path::{Component, Path};

use crate::compose::{compose, LanguageTable};
use crate::domain::{Identity, Node, OutputDocument, Policy};
use crate::error::{RootError, SelectionError};
use crate::filter::{IgnoreSpec, VisibilityFilter};
use crate::fs::{FileSystem, OsFileSystem};
use crate::scan::TreeBuilder;
use crate::selection::SelectionStore;

/// The currently selected root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootHandle {
    identity: Identity,
    name: String,
}

impl RootHandle {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Last path component, used as the label prefix in composed output.
    pub fn name(&self) -> &str {
        &self.name
    }
}

pub struct Workspace<F: FileSystem = OsFileSystem> {
    fs: F,
    policy: Policy,
    languages: LanguageTable,
    root: Option<RootHandle>,
    ignore: Option<IgnoreSpec>,
    tree: Option<Node>,
    selection: SelectionStore,
}

impl Default for Workspace<OsFileSystem> {
    fn default() -> Self {
        Self::with_fs(OsFileSystem)
    }
}

impl Workspace<OsFileSystem> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: FileSystem> Workspace<F> {
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            policy: Policy::default(),
            languages: LanguageTable::default(),
            root: None,
            ignore: None,
            tree: None,
            selection: SelectionStore::new(),
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_languages(mut self, languages: LanguageTable) -> Self {
        self.languages = languages;
        self
    }

    /// Select a new root directory, clearing the selection and building its tree.
    pub fn set_root(&mut self, path: &Path) -> Result<RootHandle, RootError> {
        if !self.fs.exists(path) {
            return Err(RootError::Missing(path.to_path_buf()));
        }
        if !self.fs.is_dir(path) {
            return Err(RootError::NotADirectory(path.to_path_buf()));
        }
        let canonical = self
            .fs
            .canonicalize(path)
            .map_err(|source| RootError::Unreadable { path: path.to_path_buf(), source })?;
        self.fs
            .list_dir(&canonical)
            .map_err(|source| RootError::Unreadable { path: canonical.clone(), source })?;

        let name = canonical
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| canonical.display().to_string());
        let handle = RootHandle { identity: Identity::new(canonical), name };
        tracing::debug!("Root set to {}", handle.identity);

        self.selection.clear();
        self.root = Some(handle.clone());
        self.ignore = self.load_ignore(&handle.identity);
        let tree = self.build_tree(&handle.identity);
        self.tree = Some(tree);
        Ok(handle)
    }

    /// Update the visibility policy. The tree reflects it after the next rebuild.
    pub fn set_policy(&mut self, show_hidden: bool, respect_ignore: bool) {
        let reload = respect_ignore != self.policy.respect_ignore;
        self.policy = Policy { show_hidden, respect_ignore };
        if reload {
            self.ignore = self.root.as_ref().and_then(|root| self.load_ignore(&root.identity));
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Rebuild the tree under the current policy, carrying the selection over.
    pub fn rebuild(&mut self) -> Result<&Node, RootError> {
        let root = self.root.as_ref().ok_or(RootError::NotSet)?.identity.clone();

        let state = self.selection.snapshot(&self.fs);
        self.ignore = self.load_ignore(&root);
        let mut tree = self.build_tree(&root);
        self.selection.restore(state, &tree);
        self.selection.apply_expansion(&mut tree);

        Ok(&*self.tree.insert(tree))
    }

    pub fn root(&self) -> Option<&RootHandle> {
        self.root.as_ref()
    }

    pub fn tree(&self) -> Option<&Node> {
        self.tree.as_ref()
    }

    pub fn ignore_spec(&self) -> Option<&IgnoreSpec> {
        self.ignore.as_ref()
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Identity for a root-relative path, whether or not it is currently visible.
    ///
    /// Returns `None` without a root, or when the path is absolute or climbs
    /// out of the root.
    pub fn resolve(&self, relative_path: &str) -> Option<Identity> {
        let mut identity = self.root.as_ref()?.identity.clone();
        for component in Path::new(relative_path).components() {
            match component {
                Component::Normal(part) => identity = identity.join(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(identity)
    }

    /// Flip the checked state of a visible file.
    pub fn toggle(&mut self, identity: &Identity) -> Result<bool, SelectionError> {
        let entry = self.lookup(identity)?.entry.clone();
        self.selection.toggle_checked(&entry)
    }

    /// Check a visible file, leaving it checked if it already was.
    pub fn check(&mut self, identity: &Identity) -> Result<(), SelectionError> {
        let entry = self.lookup(identity)?.entry.clone();
        self.selection.check(&entry)
    }

    pub fn set_expanded(
        &mut self,
        identity: &Identity,
        expanded: bool,
    ) -> Result<(), SelectionError> {
        let entry = self.lookup(identity)?.entry.clone();
        self.selection.set_expanded(&entry, expanded)?;
        if let Some(tree) = self.tree.as_mut() {
            self.selection.apply_expansion(tree);
        }
        Ok(())
    }

    pub fn is_checked(&self, identity: &Identity) -> bool {
        self.selection.is_checked(identity)
    }

    pub fn selection_count(&self) -> usize {
        self.selection.checked_count()
    }

    /// Every file in the current tree, in tree order.
    pub fn visible_files(&self) -> Vec<Identity> {
        self.tree.as_ref().map(Node::file_identities).unwrap_or_default()
    }

    pub fn compose(&self) -> OutputDocument {
        let root = self.root.as_ref().map(RootHandle::identity);
        compose(&self.fs, &self.selection, root, &self.languages)
    }

    fn lookup(&self, identity: &Identity) -> Result<&Node, SelectionError> {
        self.tree
            .as_ref()
            .and_then(|tree| tree.find(identity))
            .ok_or_else(|| SelectionError::UnknownEntry(identity.clone()))
    }

    fn load_ignore(&self, root: &Identity) -> Option<IgnoreSpec> {
        if !self.policy.respect_ignore {
            return None;
        }
        IgnoreSpec::load(&self.fs, root.as_path())
    }

    fn build_tree(&self, root: &Identity) -> Node {
        let filter = VisibilityFilter::new(root.as_path(), self.policy, self.ignore.clone());
        TreeBuilder::new(&self.fs, &filter).build(root)
    }
}
