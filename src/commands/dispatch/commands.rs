//! Command implementations for all cairn subcommands

use crate::cli::Commands;
use crate::commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use cairn_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let result = match self {
            Commands::Init => commands::init::execute(ctx),
            Commands::Pass => commands::pass::execute(ctx),
            Commands::Watch { interval, grace } => commands::watch::execute(ctx, *interval, *grace),
            Commands::Append { content } => commands::append::execute(ctx, content.as_deref()),
            Commands::Branch {
                parent,
                label,
                content,
            } => commands::branch::execute(ctx, parent, label, content.as_deref()),
            Commands::Unlink { from, target } => commands::unlink::execute(ctx, from, target),
            Commands::Targets => commands::targets::execute(ctx),
            Commands::Compress { id, level, content } => {
                commands::compress::execute(ctx, id, *level, content.as_deref())
            }
            Commands::Prune { max_orphan_age } => commands::prune::execute(ctx, *max_orphan_age),
            Commands::Render { tokens } => commands::render::execute(ctx, *tokens),
            Commands::Show { id } => commands::show::execute(ctx, id),
            Commands::Status => commands::status::execute(ctx),
            Commands::Validate => commands::validate::execute(ctx),
        };
        tracing::debug!(elapsed = ?ctx.start.elapsed(), "execute_command");
        result
    }
}
