//! fileweave: weave selected files from a directory tree into one prompt-ready document

use anyhow::Result;

fn main() -> Result<()> {
    fileweave::cli::run()
}
