//! Value parsers for clap arguments

use cairn_core::id::NodeId;
use cairn_core::tree::CompressionLevel;

pub fn parse_level(s: &str) -> Result<CompressionLevel, String> {
    s.parse::<CompressionLevel>().map_err(|e| e.to_string())
}

pub fn parse_node_id(s: &str) -> Result<NodeId, String> {
    NodeId::new(s.trim()).map_err(|e| e.to_string())
}
