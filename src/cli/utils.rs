//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compose::LanguageTable;
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::Config;
use crate::workspace::Workspace;

/// Root directory and visibility options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Root directory to weave files from
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Show entries whose name starts with '.'
    #[arg(long)]
    pub show_hidden: bool,

    /// Ignore .gitignore rules
    #[arg(long)]
    pub no_gitignore: bool,

    /// Path to config file (fileweave.toml or .fileweave.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl SourceArgs {
    /// Load config for the root, apply CLI overrides and open a workspace on it.
    pub fn open(&self, format: Option<String>) -> Result<(Workspace, Config)> {
        let file_config = load_config(&self.path, self.config.as_deref())?;
        let overrides = CliOverrides {
            show_hidden: self.show_hidden.then_some(true),
            respect_gitignore: self.no_gitignore.then_some(false),
            format,
        };
        let config = merge_cli_with_config(file_config, &overrides)?;

        let mut workspace = Workspace::new()
            .with_policy(config.policy())
            .with_languages(LanguageTable::with_overrides(config.languages.clone()));
        workspace
            .set_root(&self.path)
            .with_context(|| format!("Cannot open {}", self.path.display()))?;
        Ok((workspace, config))
    }
}

/// Read root-relative paths from a selection file, one per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn read_selection_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed reading selection file: {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_selection_file_skips_comments() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("sel.txt");
        fs::write(&path, "# chosen\nsrc/main.py\n\n  docs/a.md  \n").expect("write");

        let paths = read_selection_file(&path).expect("read");
        assert_eq!(paths, vec!["src/main.py", "docs/a.md"]);
    }

    #[test]
    fn test_open_applies_cli_overrides() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("fileweave.toml"), "show_hidden = false\n").expect("write");
        let args = SourceArgs {
            path: tmp.path().to_path_buf(),
            show_hidden: true,
            no_gitignore: true,
            config: None,
        };

        let (workspace, config) = args.open(None).expect("open");
        assert!(config.show_hidden);
        assert!(!workspace.policy().respect_ignore);
        assert!(workspace.root().is_some());
    }
}
