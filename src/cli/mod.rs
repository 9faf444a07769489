//! Command-line interface for fileweave
//!
//! Provides `tree`, `compose` and `session` subcommands over one workspace.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod compose;
mod session;
mod tree;
mod utils;

pub use session::run_session;

/// Weave selected files from a directory tree into one prompt-ready document
#[derive(Parser)]
#[command(name = "fileweave")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the filtered directory tree
    Tree(tree::TreeArgs),

    /// Compose selected files into one annotated document
    Compose(Box<compose::ComposeArgs>),

    /// Drive a selection interactively with line commands on stdin
    Session(session::SessionArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Tree(args) => tree::run(args),
        Commands::Compose(args) => compose::run(*args),
        Commands::Session(args) => session::run(args),
    }
}
