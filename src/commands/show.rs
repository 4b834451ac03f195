//! `cairn show` - print one node

use chrono::SecondsFormat;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::print_json;
use cairn_core::error::{CairnError, Result};
use cairn_core::id::NodeId;

pub fn execute(ctx: &CommandContext, id: &NodeId) -> Result<()> {
    let curator = ctx.open_curator()?;
    let node = curator
        .tree()
        .get(id)
        .ok_or_else(|| CairnError::not_found(id))?;

    output_by_format!(ctx.cli.format,
        json => print_json(node),
        human => {
            println!("{}", node.id);
            println!("level:   {}", node.compression_level);
            println!("depth:   {}", node.depth);
            println!("created: {}", node.created_at.to_rfc3339_opts(SecondsFormat::Secs, true));
            println!("updated: {}", node.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true));
            for link in &node.links {
                println!("link:    {} -> {}", link.label, link.target_id);
            }
            println!();
            println!("{}", node.content);
        }
    )
}
