//! CLI flag overrides layered on top of a loaded config.

use anyhow::Result;

use crate::domain::{Config, OutputFormat};

/// Values given on the command line. `None` leaves the config value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub show_hidden: Option<bool>,
    pub respect_gitignore: Option<bool>,
    pub format: Option<String>,
}

pub fn merge_cli_with_config(mut config: Config, cli: &CliOverrides) -> Result<Config> {
    if let Some(show_hidden) = cli.show_hidden {
        config.show_hidden = show_hidden;
    }
    if let Some(respect) = cli.respect_gitignore {
        config.respect_gitignore = respect;
    }
    if let Some(format) = &cli.format {
        config.format = OutputFormat::parse(format).ok_or_else(|| {
            anyhow::anyhow!("Invalid output format '{}'. Use 'markdown' or 'json'.", format)
        })?;
    }
    Ok(config)
}
