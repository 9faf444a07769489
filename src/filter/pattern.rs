//! Ignore-file rule compilation and matching.
//!
//! Rules follow `.gitignore` conventions as implemented by the `ignore` crate:
//! blank lines and `#` comments are skipped, a leading `!` negates, a trailing
//! `/` restricts the rule to directories, and a pattern containing a `/` (other
//! than a trailing one) is anchored to the root. Rules are evaluated in file
//! order and the last matching rule decides. Braces match literally, as in git.

use ignore::gitignore::{Gitignore, GitignoreBuilder, Glob};
use ignore::Match;
use std::borrow::Cow;
use std::io;
use std::path::Path;

use crate::error::MalformedPatternError;
use crate::fs::FileSystem;
use crate::utils::decode_text;

/// The only ignore file consulted, read from the root directory.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// The rule that decided a match.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreRule<'a> {
    glob: &'a Glob,
}

impl<'a> IgnoreRule<'a> {
    /// The rule as written in the ignore file.
    pub fn pattern(&self) -> &'a str {
        self.glob.original()
    }

    pub fn is_negated(&self) -> bool {
        self.glob.is_whitelist()
    }

    pub fn is_dir_only(&self) -> bool {
        self.glob.is_only_dir()
    }
}

/// Ordered set of ignore rules parsed from one ignore file.
///
/// Paths are matched relative to the root the rules were loaded from.
#[derive(Debug, Clone)]
pub struct IgnoreSpec {
    matcher: Gitignore,
}

impl Default for IgnoreSpec {
    fn default() -> Self {
        Self { matcher: Gitignore::empty() }
    }
}

impl IgnoreSpec {
    /// Compile ignore-file lines. Lines that do not form a valid pattern are
    /// logged and skipped; compilation itself never fails.
    pub fn compile<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GitignoreBuilder::new(".");
        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if let Err(source) = builder.add_line(None, &escape_braces(line)) {
                let err = MalformedPatternError {
                    line_number: idx + 1,
                    line: line.to_string(),
                    source,
                };
                tracing::warn!("{}", err);
            }
        }

        let matcher = match builder.build() {
            Ok(matcher) => matcher,
            Err(e) => {
                tracing::warn!("Failed to build ignore rules, using none: {}", e);
                Gitignore::empty()
            }
        };
        Self { matcher }
    }

    /// Load `.gitignore` from `root`. A missing or unreadable file yields `None`.
    pub fn load<F: FileSystem + ?Sized>(fs: &F, root: &Path) -> Option<Self> {
        let path = root.join(IGNORE_FILE_NAME);
        let bytes = match fs.read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No {} in {}", IGNORE_FILE_NAME, root.display());
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };
        match decode_text(&bytes) {
            Ok(text) => {
                let spec = Self::compile(text.lines());
                tracing::debug!("Loaded {} ignore rules from {}", spec.len(), path.display());
                Some(spec)
            }
            Err(e) => {
                tracing::warn!("Failed to decode {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.matcher.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }

    /// Whether `relative_path` (slash-separated, relative to the root) is excluded.
    ///
    /// A rule that matches any ancestor directory of the path also matches the
    /// path itself, so `build/` excludes `build/out/app.js`.
    pub fn matches(&self, relative_path: &str, is_dir: bool) -> bool {
        self.decisive_rule(relative_path, is_dir).is_some_and(|rule| !rule.is_negated())
    }

    /// The last rule matching `relative_path` or its nearest matched ancestor.
    pub fn decisive_rule(&self, relative_path: &str, is_dir: bool) -> Option<IgnoreRule<'_>> {
        let path = relative_path.trim_start_matches("./").trim_start_matches('/');
        if path.is_empty() {
            return None;
        }
        match self.matcher.matched_path_or_any_parents(path, is_dir) {
            Match::None => None,
            Match::Ignore(glob) | Match::Whitelist(glob) => Some(IgnoreRule { glob }),
        }
    }
}

/// Escape unescaped `{` and `}` so they are not read as alternation.
fn escape_braces(line: &str) -> Cow<'_, str> {
    if !line.contains(['{', '}']) {
        return Cow::Borrowed(line);
    }
    let mut out = String::with_capacity(line.len() + 4);
    let mut escaped = false;
    for c in line.chars() {
        if !escaped && (c == '{' || c == '}') {
            out.push('\\');
        }
        escaped = !escaped && c == '\\';
        out.push(c);
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::OsFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn spec(lines: &[&str]) -> IgnoreSpec {
        IgnoreSpec::compile(lines.iter().copied())
    }

    #[test]
    fn test_negation_reincludes_later() {
        let spec = spec(&["*.log", "!keep.log"]);
        assert!(spec.matches("other.log", false));
        assert!(!spec.matches("keep.log", false));
        assert!(spec.matches("nested/deep/other.log", false));
        assert!(!spec.matches("nested/keep.log", false));
    }

    #[test]
    fn test_last_match_wins() {
        let spec = spec(&["!keep.log", "*.log"]);
        assert!(spec.matches("keep.log", false));
    }

    #[test]
    fn test_directory_rule_excludes_dir_and_contents() {
        let spec = spec(&["build/"]);
        assert!(spec.matches("build", true));
        assert!(!spec.matches("build", false), "a file named build is not a directory");
        assert!(spec.matches("build/out/app.js", false));
        assert!(spec.matches("src/build", true), "unanchored rules match at any depth");
    }

    #[test]
    fn test_contents_pattern_matches_descendants_only() {
        let spec = spec(&["dist/**"]);
        assert!(!spec.matches("dist", true));
        assert!(spec.matches("dist/**", false));
        assert!(spec.matches("dist/bundle.js", false));
    }

    #[test]
    fn test_anchored_patterns() {
        let spec = spec(&["/todo.txt", "docs/*.md"]);
        assert!(spec.matches("todo.txt", false));
        assert!(!spec.matches("sub/todo.txt", false));
        assert!(spec.matches("docs/intro.md", false));
        assert!(!spec.matches("docs/api/intro.md", false), "* does not cross a separator");
        let rule = spec.decisive_rule("todo.txt", false).expect("rule");
        assert_eq!(rule.pattern(), "/todo.txt");
    }

    #[test]
    fn test_double_star_infix() {
        let spec = spec(&["a/**/z.txt"]);
        assert!(spec.matches("a/z.txt", false));
        assert!(spec.matches("a/b/c/z.txt", false));
        assert!(!spec.matches("b/z.txt", false));
    }

    #[test]
    fn test_comments_blanks_and_escapes() {
        let spec = spec(&["# comment", "", "   ", "\\#hash", "\\!bang", "trail   "]);
        assert_eq!(spec.len(), 3);
        assert!(spec.matches("#hash", false));
        assert!(spec.matches("!bang", false));
        assert!(spec.matches("trail", false));
        assert!(!spec.decisive_rule("!bang", false).expect("rule").is_negated());
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let spec = spec(&["[unclosed", "*.tmp"]);
        assert_eq!(spec.len(), 1);
        assert!(spec.matches("x.tmp", false));
    }

    #[test]
    fn test_rule_flags() {
        let spec = spec(&["out/", "!out/"]);
        let rule = spec.decisive_rule("out", true).expect("rule");
        assert_eq!(rule.pattern(), "!out/");
        assert!(rule.is_negated());
        assert!(rule.is_dir_only());
        assert!(!spec.matches("out", true));
        assert!(spec.decisive_rule("out", false).is_none());
    }

    #[test]
    fn test_braces_match_literally() {
        let spec = spec(&["{a,b}.txt", "\\{x}.md"]);
        assert!(spec.matches("{a,b}.txt", false));
        assert!(!spec.matches("a.txt", false));
        assert!(!spec.matches("b.txt", false));
        assert!(spec.matches("{x}.md", false));
    }

    #[test]
    fn test_no_rules_matches_nothing() {
        let spec = IgnoreSpec::default();
        assert!(spec.is_empty());
        assert!(!spec.matches("anything", false));
        assert!(!spec.matches("", true));
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let tmp = TempDir::new().expect("tmp");
        assert!(IgnoreSpec::load(&OsFileSystem, tmp.path()).is_none());
    }

    #[test]
    fn test_load_reads_root_gitignore() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".gitignore"), "*.log\r\n!keep.log\r\n").expect("write");
        let spec = IgnoreSpec::load(&OsFileSystem, tmp.path()).expect("spec");
        assert_eq!(spec.len(), 2);
        assert!(!spec.matches("keep.log", false));
    }

    #[test]
    fn test_load_undecodable_file_is_none() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".gitignore"), b"*.log\n\x80\x81\n").expect("write");
        assert!(IgnoreSpec::load(&OsFileSystem, tmp.path()).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_load_unreadable_file_is_none() {
        let tmp = TempDir::new().expect("tmp");
        fs::create_dir(tmp.path().join(".gitignore")).expect("mkdir");
        assert!(IgnoreSpec::load(&OsFileSystem, tmp.path()).is_none());
    }
}
