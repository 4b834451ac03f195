//! Configuration type definitions

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::id::IdScheme;

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Top-level configuration (`config.toml` in the data dir)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CairnConfig {
    /// Config format version for compatibility checking
    #[serde(default = "default_version")]
    pub version: u32,

    /// ID generation scheme for new nodes
    #[serde(default)]
    pub id_scheme: IdScheme,

    #[serde(default)]
    pub compaction: CompactionConfig,

    #[serde(default)]
    pub prune: PruneConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub summarizer: SummarizerConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

/// Age thresholds for each rung of the compression ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactionConfig {
    /// full -> summary (default 1 hour)
    #[serde(default = "default_summary_after")]
    pub summary_after_secs: u64,

    /// summary -> oneliner (default 1 day)
    #[serde(default = "default_oneliner_after")]
    pub oneliner_after_secs: u64,

    /// oneliner -> tag (default 1 week)
    #[serde(default = "default_tag_after")]
    pub tag_after_secs: u64,

    /// Fold direct branches into a spine node when it steps down to oneliner
    #[serde(default)]
    pub absorb_branches: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PruneConfig {
    /// Unreachable nodes older than this are evicted (default 1 week)
    #[serde(default = "default_max_orphan_age")]
    pub max_orphan_age_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Approximate token budget for the briefing
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,

    /// Characters per token used to turn the budget into a character count
    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: usize,

    /// Fixed first line(s) of every briefing
    #[serde(default = "default_header")]
    pub header: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Append-only source stream to consume (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Upper bound on bytes read per pass
    #[serde(default = "default_max_chunk_bytes")]
    pub max_chunk_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// External program and arguments; absent means the built-in extractive summarizer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,

    /// Kill the external program after this many seconds
    #[serde(default = "default_summarizer_timeout")]
    pub timeout_secs: u64,
}

/// File names, relative to the data dir unless absolute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot: PathBuf,

    #[serde(default = "default_cursor_path")]
    pub cursor: PathBuf,

    #[serde(default = "default_briefing_path")]
    pub briefing: PathBuf,
}

fn default_version() -> u32 {
    CONFIG_FORMAT_VERSION
}

fn default_summary_after() -> u64 {
    60 * 60
}

fn default_oneliner_after() -> u64 {
    24 * 60 * 60
}

fn default_tag_after() -> u64 {
    7 * 24 * 60 * 60
}

fn default_max_orphan_age() -> u64 {
    7 * 24 * 60 * 60
}

fn default_token_budget() -> usize {
    2000
}

fn default_chars_per_token() -> usize {
    4
}

pub(crate) fn default_header() -> String {
    "# Memory briefing".to_string()
}

fn default_max_chunk_bytes() -> usize {
    64 * 1024
}

fn default_summarizer_timeout() -> u64 {
    60
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("tree.json")
}

fn default_cursor_path() -> PathBuf {
    PathBuf::from("cursor.json")
}

fn default_briefing_path() -> PathBuf {
    PathBuf::from("BRIEFING.md")
}

impl Default for CairnConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            id_scheme: IdScheme::default(),
            compaction: CompactionConfig::default(),
            prune: PruneConfig::default(),
            render: RenderConfig::default(),
            ingest: IngestConfig::default(),
            summarizer: SummarizerConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            summary_after_secs: default_summary_after(),
            oneliner_after_secs: default_oneliner_after(),
            tag_after_secs: default_tag_after(),
            absorb_branches: false,
        }
    }
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            max_orphan_age_secs: default_max_orphan_age(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            token_budget: default_token_budget(),
            chars_per_token: default_chars_per_token(),
            header: default_header(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source: None,
            max_chunk_bytes: default_max_chunk_bytes(),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            timeout_secs: default_summarizer_timeout(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot_path(),
            cursor: default_cursor_path(),
            briefing: default_briefing_path(),
        }
    }
}
