//! Compose command implementation

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, MultiSelect};
use std::collections::HashSet;
use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;

use super::utils::{read_selection_file, SourceArgs};
use crate::domain::{Identity, OutputFormat};
use crate::fs::FileSystem;
use crate::render::{render_json, render_markdown, status_line};
use crate::workspace::Workspace;

#[derive(Args)]
pub struct ComposeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Root-relative files to include (repeatable or comma-separated)
    #[arg(short, long, value_name = "PATHS", value_delimiter = ',', num_args = 1..)]
    pub select: Vec<String>,

    /// File listing root-relative paths to include, one per line
    #[arg(long, value_name = "FILE")]
    pub selection_file: Option<PathBuf>,

    /// Include every visible file
    #[arg(long)]
    pub all: bool,

    /// Choose files interactively
    #[arg(long)]
    pub pick: bool,

    /// Output format: 'markdown' or 'json'
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Write the document to this file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ComposeArgs) -> Result<()> {
    let (mut workspace, config) = args.source.open(args.format.clone())?;

    let mut requested = args.select.clone();
    if let Some(path) = &args.selection_file {
        requested.extend(read_selection_file(path)?);
    }
    for path in &requested {
        let Some(id) = workspace.resolve(path) else {
            eprintln!("warning: skipping {}: not a path under the root", path);
            continue;
        };
        if let Err(e) = workspace.check(&id) {
            eprintln!("warning: skipping {}: {}", path, e);
        }
    }

    if args.all {
        for id in workspace.visible_files() {
            workspace.check(&id)?;
        }
    }

    if args.pick {
        if !(std::io::stdin().is_terminal() && std::io::stderr().is_terminal()) {
            anyhow::bail!("--pick needs an interactive terminal");
        }
        pick_files(&mut workspace)?;
    }

    let doc = workspace.compose();
    let rendered = match config.format {
        OutputFormat::Markdown => render_markdown(&doc),
        OutputFormat::Json => render_json(&doc)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed writing output: {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }

    let errors = doc.blocks().iter().filter(|b| b.is_error()).count();
    if errors > 0 {
        eprintln!("{} ({} unreadable)", status_line(workspace.selection_count()), errors);
    } else {
        eprintln!("{}", status_line(workspace.selection_count()));
    }
    Ok(())
}

/// Let the user tick visible files; the result replaces the current selection.
fn pick_files<F: FileSystem>(workspace: &mut Workspace<F>) -> Result<()> {
    let Some(root) = workspace.root().map(|r| r.identity().clone()) else {
        return Ok(());
    };
    let files: Vec<Identity> = workspace.visible_files();
    if files.is_empty() {
        return Ok(());
    }

    let labels: Vec<String> =
        files.iter().map(|id| id.relative_to(&root).unwrap_or_else(|| id.to_string())).collect();
    let defaults: Vec<bool> = files.iter().map(|id| workspace.is_checked(id)).collect();

    let chosen: HashSet<usize> = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select files to weave")
        .items(&labels)
        .defaults(&defaults)
        .interact()?
        .into_iter()
        .collect();

    for (idx, id) in files.iter().enumerate() {
        if chosen.contains(&idx) != workspace.is_checked(id) {
            workspace.toggle(id)?;
        }
    }
    Ok(())
}
