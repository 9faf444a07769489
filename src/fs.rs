//! Filesystem primitives the core consumes.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::EntryKind;

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub name: OsString,
    pub kind: EntryKind,
}

/// Directory listing and file reading as supplied by the environment.
pub trait FileSystem {
    /// List the immediate children of `path`. Symlinks report their target's kind.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirListing>>;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Fully resolved absolute path, following every symlink.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirListing>> {
        let mut listing = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_symlink() {
                // Dangling links stay files; reading them later reports the error.
                match std::fs::metadata(entry.path()) {
                    Ok(meta) if meta.is_dir() => EntryKind::Directory,
                    _ => EntryKind::File,
                }
            } else {
                EntryKind::File
            };
            listing.push(DirListing { name: entry.file_name(), kind });
        }
        Ok(listing)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        path.canonicalize()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_dir_reports_kinds() {
        let tmp = TempDir::new().expect("tmp");
        fs::create_dir(tmp.path().join("sub")).expect("mkdir");
        fs::write(tmp.path().join("a.txt"), "a").expect("write");

        let mut listing = OsFileSystem.list_dir(tmp.path()).expect("list");
        listing.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].kind, EntryKind::File);
        assert_eq!(listing[1].kind, EntryKind::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_reports_target_kind() {
        let tmp = TempDir::new().expect("tmp");
        fs::create_dir(tmp.path().join("real")).expect("mkdir");
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link"))
            .expect("symlink");
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("dangling"))
            .expect("symlink");

        let listing = OsFileSystem.list_dir(tmp.path()).expect("list");
        let kind_of = |name: &str| listing.iter().find(|l| l.name == name).map(|l| l.kind);
        assert_eq!(kind_of("link"), Some(EntryKind::Directory));
        assert_eq!(kind_of("dangling"), Some(EntryKind::File));
    }
}
