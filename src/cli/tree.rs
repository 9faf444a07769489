//! Tree command implementation

use anyhow::Result;
use clap::Args;

use super::utils::SourceArgs;
use crate::render::{render_tree, status_line};

#[derive(Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Mark these root-relative files as checked (repeatable or comma-separated)
    #[arg(short, long, value_name = "PATHS", value_delimiter = ',', num_args = 1..)]
    pub select: Vec<String>,
}

pub fn run(args: TreeArgs) -> Result<()> {
    let (mut workspace, _) = args.source.open(None)?;

    for path in &args.select {
        let Some(id) = workspace.resolve(path) else {
            eprintln!("warning: skipping {}: not a path under the root", path);
            continue;
        };
        if let Err(e) = workspace.check(&id) {
            eprintln!("warning: skipping {}: {}", path, e);
        }
    }

    let Some(tree) = workspace.tree() else {
        anyhow::bail!("No directory selected");
    };
    println!("{}", render_tree(tree, workspace.selection(), true));
    println!();
    println!(
        "{} files visible, {}",
        workspace.visible_files().len(),
        status_line(workspace.selection_count())
    );
    Ok(())
}
