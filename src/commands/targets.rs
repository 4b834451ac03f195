//! `cairn targets` - list nodes due for compression

use chrono::Utc;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::print_json;
use cairn_core::compaction::select_targets;
use cairn_core::error::Result;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let curator = ctx.open_curator()?;
    let targets = select_targets(
        curator.tree(),
        &curator.config().age_thresholds(),
        Utc::now(),
    );

    output_by_format!(ctx.cli.format,
        json => print_json(&targets),
        human => {
            if targets.is_empty() && !ctx.cli.quiet {
                println!("No compaction targets");
            }
            for t in &targets {
                println!("{}  {} -> {}  age {}s", t.id, t.from, t.to, t.age_secs);
            }
        }
    )
}
