//! `cairn status` - tree overview

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::print_json;
use cairn_core::curation::Curator;
use cairn_core::error::Result;
use cairn_core::graph::orphans;
use cairn_core::id::NodeId;
use cairn_core::tree::CompressionLevel;

#[derive(Debug, Serialize)]
struct Status {
    data_dir: String,
    nodes: usize,
    spine_len: usize,
    branches: usize,
    levels: BTreeMap<String, usize>,
    orphans: Vec<NodeId>,
    head: Option<NodeId>,
    cursor_offset: u64,
    source: Option<String>,
}

fn collect(curator: &Curator) -> Status {
    let tree = curator.tree();
    let mut levels: BTreeMap<String, usize> = CompressionLevel::ALL
        .iter()
        .map(|l| (l.to_string(), 0))
        .collect();
    for node in tree.nodes() {
        *levels.entry(node.compression_level.to_string()).or_default() += 1;
    }

    Status {
        data_dir: curator.store().root().display().to_string(),
        nodes: tree.len(),
        spine_len: tree.spine().len(),
        branches: tree.nodes().filter(|n| n.is_branch()).count(),
        levels,
        orphans: orphans(tree),
        head: tree.head().map(|n| n.id.clone()),
        cursor_offset: curator.cursor().offset,
        source: curator
            .config()
            .ingest
            .source
            .as_ref()
            .map(|p| p.display().to_string()),
    }
}

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let curator = ctx.open_curator()?;
    let status = collect(&curator);

    output_by_format!(ctx.cli.format,
        json => print_json(&status),
        human => {
            println!("Data dir: {}", status.data_dir);
            println!("Nodes:    {} ({} on spine, {} branches)", status.nodes, status.spine_len, status.branches);
            for level in CompressionLevel::ALL {
                let count = status.levels.get(level.as_str()).copied().unwrap_or_default();
                println!("  {:<9} {}", level.as_str(), count);
            }
            println!("Orphans:  {}", status.orphans.len());
            if let Some(head) = &status.head {
                println!("Head:     {}", head);
            }
            if let Some(source) = &status.source {
                println!("Source:   {} (offset {})", source, status.cursor_offset);
            }
        }
    )
}
