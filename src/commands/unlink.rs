//! `cairn unlink` - drop links between two nodes

use serde_json::json;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::print_json;
use cairn_core::error::Result;
use cairn_core::id::NodeId;

pub fn execute(ctx: &CommandContext, from: &NodeId, target: &NodeId) -> Result<()> {
    let mut curator = ctx.open_curator()?;
    let removed = curator.tree_mut().unlink(from, target)?;
    if removed > 0 {
        curator.persist()?;
    }

    output_by_format!(ctx.cli.format,
        json => print_json(&json!({ "from": from, "target": target, "removed": removed })),
        human => {
            if !ctx.cli.quiet {
                println!("Removed {} link(s) from {} to {}", removed, from, target);
            }
        }
    )
}
