//! Session command: drive a workspace with line commands on stdin.
//!
//! Each line is one command. Policy changes rebuild the tree right away, so
//! checked files stay checked as long as they remain visible.

use anyhow::Result;
use clap::Args;
use std::io::{self, BufRead, Write};
use std::path::Path;

use super::utils::SourceArgs;
use crate::fs::FileSystem;
use crate::render::{render_markdown, render_tree, status_line};
use crate::workspace::Workspace;

const HELP: &str = "\
commands:
  root PATH        choose a new root directory (clears the selection)
  toggle PATH      check or uncheck a file
  expand PATH      expand a folder in the tree view
  collapse PATH    collapse a folder in the tree view
  hidden on|off    show or hide dotfiles, then refresh
  ignore on|off    respect or ignore .gitignore, then refresh
  refresh          rebuild the tree, keeping the selection
  tree             print the tree
  status           print the number of selected files
  compose          print the composed document
  help             print this message
  quit             leave the session";

#[derive(Args)]
pub struct SessionArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: SessionArgs) -> Result<()> {
    let (mut workspace, _) = args.source.open(None)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut workspace, stdin.lock(), &mut stdout.lock())
}

/// Execute commands from `input` until it ends or `quit` is read.
///
/// A failing command prints its error and the session continues.
pub fn run_session<F, R, W>(workspace: &mut Workspace<F>, input: R, out: &mut W) -> Result<()>
where
    F: FileSystem,
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "quit" | "exit" => break,
            "help" => writeln!(out, "{}", HELP)?,
            "root" => match workspace.set_root(Path::new(arg)) {
                Ok(root) => writeln!(out, "Selected: {}", root.name())?,
                Err(e) => writeln!(out, "error: {}", e)?,
            },
            "toggle" => match workspace.resolve(arg) {
                Some(id) => match workspace.toggle(&id) {
                    Ok(true) => writeln!(out, "[x] {}", arg)?,
                    Ok(false) => writeln!(out, "[ ] {}", arg)?,
                    Err(e) => writeln!(out, "error: {}", e)?,
                },
                None => writeln!(out, "error: cannot resolve '{}'", arg)?,
            },
            "expand" | "collapse" => match workspace.resolve(arg) {
                Some(id) => {
                    if let Err(e) = workspace.set_expanded(&id, command == "expand") {
                        writeln!(out, "error: {}", e)?;
                    }
                }
                None => writeln!(out, "error: cannot resolve '{}'", arg)?,
            },
            "hidden" | "ignore" => {
                let Some(on) = parse_switch(arg) else {
                    writeln!(out, "error: expected 'on' or 'off'")?;
                    continue;
                };
                let policy = workspace.policy();
                if command == "hidden" {
                    workspace.set_policy(on, policy.respect_ignore);
                } else {
                    workspace.set_policy(policy.show_hidden, on);
                }
                refresh(workspace, out)?;
            }
            "refresh" => refresh(workspace, out)?,
            "tree" => match workspace.tree() {
                Some(tree) => writeln!(out, "{}", render_tree(tree, workspace.selection(), false))?,
                None => writeln!(out, "error: no directory selected")?,
            },
            "status" => writeln!(out, "{}", status_line(workspace.selection_count()))?,
            "compose" => write!(out, "{}", render_markdown(&workspace.compose()))?,
            other => writeln!(out, "error: unknown command '{}' (try 'help')", other)?,
        }
    }
    out.flush()?;
    Ok(())
}

fn refresh<F: FileSystem, W: Write>(workspace: &mut Workspace<F>, out: &mut W) -> Result<()> {
    match workspace.rebuild() {
        Ok(_) => writeln!(out, "{}", status_line(workspace.selection_count()))?,
        Err(e) => writeln!(out, "error: {}", e)?,
    }
    Ok(())
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
