//! Command trait and context for dispatching commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::Cli;
use cairn_core::config::{CairnConfig, CONFIG_FILE};
use cairn_core::curation::Curator;
use cairn_core::error::Result;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub data_dir: PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, data_dir: PathBuf, start: Instant) -> Self {
        Self {
            cli,
            data_dir,
            start,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// `--config`, or `config.toml` inside the data dir
    pub fn config_path(&self) -> PathBuf {
        self.cli
            .config
            .clone()
            .unwrap_or_else(|| self.data_dir.join(CONFIG_FILE))
    }

    pub fn load_config(&self) -> Result<CairnConfig> {
        CairnConfig::load_or_default(&self.config_path())
    }

    pub fn open_curator(&self) -> Result<Curator> {
        let config = self.load_config()?;
        let curator = Curator::open(config, &self.data_dir)?;
        tracing::debug!(elapsed = ?self.start.elapsed(), "open_curator");
        Ok(curator)
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No subcommand given
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("cairn {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Bounded, persistent memory briefings for agents.");
        println!();
        println!("Run `cairn --help` for usage information.");
        Ok(())
    }
}
