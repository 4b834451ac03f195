//! `cairn compress` - explicit compression of one node

use serde_json::json;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::print_json;
use cairn_core::error::{CairnError, Result};
use cairn_core::id::NodeId;
use cairn_core::summarize;
use cairn_core::tree::CompressionLevel;

pub fn execute(
    ctx: &CommandContext,
    id: &NodeId,
    level: CompressionLevel,
    content: Option<&str>,
) -> Result<()> {
    let mut curator = ctx.open_curator()?;
    let node = curator
        .tree()
        .get(id)
        .ok_or_else(|| CairnError::not_found(id))?;
    let from = node.compression_level;

    let content = match content {
        Some(c) => c.to_string(),
        None if level.index() <= from.index() => String::new(),
        None => {
            let summarizer = summarize::from_config(&curator.config().summarizer)?;
            summarizer.summarize(&node.content, level)?
        }
    };

    curator.tree_mut().compress(id, content, level)?;
    curator.persist()?;

    output_by_format!(ctx.cli.format,
        json => print_json(&json!({ "id": id, "from": from, "to": level })),
        human => {
            if !ctx.cli.quiet {
                println!("Compressed {} {} -> {}", id, from, level);
            }
        }
    )
}
