//! `cairn prune` - evict unreachable nodes

use chrono::Utc;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::print_json;
use cairn_core::config::saturating_seconds;
use cairn_core::error::Result;
use cairn_core::graph::prune;

pub fn execute(ctx: &CommandContext, max_orphan_age: Option<i64>) -> Result<()> {
    let mut curator = ctx.open_curator()?;
    let max_age = max_orphan_age
        .map(saturating_seconds)
        .unwrap_or_else(|| curator.config().max_orphan_age());

    let report = prune(curator.tree_mut(), max_age, Utc::now());
    if !report.removed.is_empty() {
        curator.persist()?;
    }

    output_by_format!(ctx.cli.format,
        json => print_json(&report),
        human => {
            for id in &report.removed {
                println!("Removed {}", id);
            }
            if !ctx.cli.quiet {
                println!(
                    "Pruned {} node(s), {} orphan(s) retained",
                    report.removed.len(),
                    report.retained_orphans.len()
                );
            }
        }
    )
}
