//! Path normalization

use std::path::{Component, Path};

/// Slash-separated form of a relative path.
///
/// Built from the path's components, so only real separators become `/` and a
/// backslash inside a Unix file name is kept as is.
pub fn normalize_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::normalize_path;
    use std::path::Path;

    #[test]
    fn test_normalize_path_joins_components() {
        assert_eq!(normalize_path(Path::new("src/app/main.py")), "src/app/main.py");
        assert_eq!(normalize_path(Path::new("./src//lib.rs")), "src/lib.rs");
        assert_eq!(normalize_path(Path::new("")), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_path_keeps_backslash_in_name() {
        assert_eq!(normalize_path(Path::new(r"a\b.log")), r"a\b.log");
    }

    #[cfg(windows)]
    #[test]
    fn test_normalize_path_converts_backslashes() {
        assert_eq!(normalize_path(Path::new(r"src\app\main.py")), "src/app/main.py");
    }
}
