//! `cairn branch` - attach a topic branch below a node

use serde_json::json;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::{content_or_stdin, print_json};
use cairn_core::error::{CairnError, Result};
use cairn_core::id::NodeId;

pub fn execute(
    ctx: &CommandContext,
    parent: &NodeId,
    label: &str,
    content: Option<&str>,
) -> Result<()> {
    let mut curator = ctx.open_curator()?;
    // fail on a missing parent before blocking on stdin
    if !curator.tree().contains(parent) {
        return Err(CairnError::not_found(parent));
    }
    let content = content_or_stdin(content)?;
    let id = curator.tree_mut().add_branch(parent, content, label)?;
    curator.persist()?;

    let depth = curator.tree().get(&id).map(|n| n.depth).unwrap_or_default();
    output_by_format!(ctx.cli.format,
        json => print_json(&json!({ "id": id, "parent": parent, "label": label, "depth": depth })),
        human => {
            println!("{}", id);
        }
    )
}
