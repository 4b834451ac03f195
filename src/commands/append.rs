//! `cairn append` - add content as the new spine head

use serde_json::json;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::{content_or_stdin, print_json};
use cairn_core::error::Result;

pub fn execute(ctx: &CommandContext, content: Option<&str>) -> Result<()> {
    let content = content_or_stdin(content)?;
    let mut curator = ctx.open_curator()?;
    let id = curator.tree_mut().append_spine_node(content);
    curator.persist()?;

    output_by_format!(ctx.cli.format,
        json => print_json(&json!({ "id": id, "spine_len": curator.tree().spine().len() })),
        human => {
            println!("{}", id);
        }
    )
}
