//! Command dispatch logic for cairn

use std::time::Instant;

use crate::cli::Cli;
use cairn_core::config::resolve_data_dir;
use cairn_core::error::Result;
use tracing::debug;

mod command;
mod commands;

pub use command::CommandContext;
use command::{Command, NoCommand};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());

    debug!(data_dir = %data_dir.display(), elapsed = ?start.elapsed(), "resolve_data_dir");

    let ctx = CommandContext::new(cli, data_dir, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
