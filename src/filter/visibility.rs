//! Per-entry visibility decisions.

use std::path::{Path, PathBuf};

use super::pattern::IgnoreSpec;
use crate::domain::Policy;
use crate::utils::normalize_path;

/// Combines the hidden-file policy with the loaded ignore rules.
///
/// Pure: the verdict depends only on its arguments, the root, the policy and
/// the ignore spec captured at construction.
#[derive(Debug, Clone)]
pub struct VisibilityFilter {
    root: PathBuf,
    policy: Policy,
    ignore: Option<IgnoreSpec>,
}

impl VisibilityFilter {
    pub fn new(root: impl Into<PathBuf>, policy: Policy, ignore: Option<IgnoreSpec>) -> Self {
        Self { root: root.into(), policy, ignore }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_visible(&self, parent: &Path, name: &str, is_dir: bool) -> bool {
        if name.starts_with('.') && !self.policy.show_hidden {
            return false;
        }

        let Some(spec) = self.ignore.as_ref().filter(|_| self.policy.respect_ignore) else {
            return true;
        };

        let full_path = parent.join(name);
        let Ok(relative) = full_path.strip_prefix(&self.root) else {
            return true;
        };
        let relative = normalize_path(relative);

        if spec.matches(&relative, is_dir) {
            return false;
        }
        // Rules written for a directory's contents (`dir/**`) hide the directory too.
        if is_dir && spec.matches(&format!("{}/**", relative), false) {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(policy: Policy, lines: &[&str]) -> VisibilityFilter {
        VisibilityFilter::new("/repo", policy, Some(IgnoreSpec::compile(lines.iter().copied())))
    }

    #[test]
    fn test_hidden_entries_follow_policy() {
        let root = Path::new("/repo");
        let hidden = filter(Policy { show_hidden: false, respect_ignore: true }, &[]);
        let shown = filter(Policy { show_hidden: true, respect_ignore: true }, &[]);
        assert!(!hidden.is_visible(root, ".x", false));
        assert!(shown.is_visible(root, ".x", false));
        assert!(hidden.is_visible(root, "x", false));
    }

    #[test]
    fn test_ignore_rules_apply_relative_to_root() {
        let f = filter(Policy::default(), &["*.log", "!keep.log", "/top.txt"]);
        assert!(!f.is_visible(Path::new("/repo"), "other.log", false));
        assert!(f.is_visible(Path::new("/repo/sub"), "keep.log", false));
        assert!(!f.is_visible(Path::new("/repo"), "top.txt", false));
        assert!(f.is_visible(Path::new("/repo/sub"), "top.txt", false));
    }

    #[test]
    fn test_contents_rule_hides_directory() {
        let f = filter(Policy::default(), &["vendor/**"]);
        assert!(!f.is_visible(Path::new("/repo"), "vendor", true));
        assert!(f.is_visible(Path::new("/repo"), "vendor", false));
    }

    #[test]
    fn test_ignore_rules_skipped_when_not_respected() {
        let f = filter(Policy { show_hidden: false, respect_ignore: false }, &["*.log"]);
        assert!(f.is_visible(Path::new("/repo"), "other.log", false));
    }

    #[test]
    fn test_missing_spec_shows_everything_but_hidden() {
        let f = VisibilityFilter::new("/repo", Policy::default(), None);
        assert!(f.is_visible(Path::new("/repo"), "build", true));
        assert!(!f.is_visible(Path::new("/repo"), ".env", false));
    }

    #[cfg(unix)]
    #[test]
    fn test_backslash_in_name_is_not_a_separator() {
        let f = filter(Policy::default(), &["a/*.log"]);
        assert!(f.is_visible(Path::new("/repo"), r"a\b.log", false));
        assert!(!f.is_visible(Path::new("/repo/a"), "b.log", false));
    }
}
