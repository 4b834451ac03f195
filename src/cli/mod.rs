//! CLI argument parsing for cairn
//!
//! Global flags: --data-dir, --config, --format, --quiet, --verbose,
//! --log-level, --log-json

pub mod format;
pub mod output;
pub mod parse;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cairn_core::config::DATA_DIR_ENV;
use cairn_core::id::NodeId;
use cairn_core::tree::CompressionLevel;
pub use output::OutputFormat;
use parse::{parse_level, parse_node_id};

/// Cairn - bounded, persistent memory briefings for agents
#[derive(Parser, Debug)]
#[command(name = "cairn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the tree snapshot, cursor, briefing and config
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to config.toml inside the data dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug-level logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (overrides --verbose)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data dir and a default config (safe to re-run)
    Init,

    /// Run one curation pass: ingest, compact, prune, render, persist
    Pass,

    /// Run curation passes on a timer until interrupted
    Watch {
        /// Seconds between passes
        #[arg(long, default_value_t = 60)]
        interval: u64,

        /// Upper bound in seconds for the final pass after a shutdown signal
        #[arg(long, default_value_t = 30)]
        grace: u64,
    },

    /// Append content as the new spine head
    Append {
        /// Content (read from stdin when omitted)
        content: Option<String>,
    },

    /// Attach a branch node below an existing node
    Branch {
        #[arg(value_parser = parse_node_id)]
        parent: NodeId,

        /// Topic label for the new link
        #[arg(long, short)]
        label: String,

        /// Content (read from stdin when omitted)
        content: Option<String>,
    },

    /// Remove every link from one node to another
    Unlink {
        #[arg(value_parser = parse_node_id)]
        from: NodeId,

        #[arg(value_parser = parse_node_id)]
        target: NodeId,
    },

    /// List spine nodes due for compression without changing anything
    Targets,

    /// Replace a node's content with a more compressed rendition
    Compress {
        #[arg(value_parser = parse_node_id)]
        id: NodeId,

        /// Target level: summary, oneliner or tag
        #[arg(long, short, value_parser = parse_level)]
        level: CompressionLevel,

        /// Replacement content (generated by the summarizer when omitted)
        content: Option<String>,
    },

    /// Evict unreachable nodes older than the orphan age
    Prune {
        /// Override the configured orphan age (0 evicts every orphan)
        #[arg(long)]
        max_orphan_age: Option<i64>,
    },

    /// Print the briefing
    Render {
        /// Override the configured token budget
        #[arg(long)]
        tokens: Option<usize>,
    },

    /// Show one node
    Show {
        #[arg(value_parser = parse_node_id)]
        id: NodeId,
    },

    /// Summarize the tree: counts per level, spine length, orphans
    Status,

    /// Check structural invariants
    Validate,
}
