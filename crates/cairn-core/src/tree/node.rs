use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CairnError;
use crate::id::NodeId;

/// Detail tier of a node's content.
///
/// Ordered `Full < Summary < Oneliner < Tag`; a node only ever moves right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    Full,
    Summary,
    Oneliner,
    Tag,
}

impl CompressionLevel {
    /// The ladder, in order
    pub const ALL: [CompressionLevel; 4] = [
        CompressionLevel::Full,
        CompressionLevel::Summary,
        CompressionLevel::Oneliner,
        CompressionLevel::Tag,
    ];

    /// Position on the ladder (0 = full)
    pub fn index(self) -> usize {
        self as usize
    }

    /// The single next step, or `None` at `Tag`
    pub fn next(self) -> Option<CompressionLevel> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompressionLevel::Full => "full",
            CompressionLevel::Summary => "summary",
            CompressionLevel::Oneliner => "oneliner",
            CompressionLevel::Tag => "tag",
        }
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionLevel {
    type Err = CairnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(CompressionLevel::Full),
            "summary" => Ok(CompressionLevel::Summary),
            "oneliner" | "one-liner" => Ok(CompressionLevel::Oneliner),
            "tag" => Ok(CompressionLevel::Tag),
            other => Err(CairnError::invalid_value(
                "compression level (expected full, summary, oneliner or tag)",
                other,
            )),
        }
    }
}

/// A labelled edge to another node. Targets may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub target_id: NodeId,
    pub label: String,
}

impl Link {
    pub fn new(target_id: NodeId, label: impl Into<String>) -> Self {
        Self {
            target_id,
            label: label.into(),
        }
    }
}

/// A single memory node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 0 for spine nodes, parent depth + 1 for branches
    pub depth: u32,
    pub content: String,
    #[serde(default)]
    pub links: Vec<Link>,
    pub compression_level: CompressionLevel,
}

impl Node {
    pub(crate) fn new(id: NodeId, content: String, depth: u32, at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: at,
            updated_at: at,
            depth,
            content,
            links: Vec::new(),
            compression_level: CompressionLevel::Full,
        }
    }

    /// Time since creation. Clock skew (created in the future) reads as zero.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).max(Duration::zero())
    }

    pub fn is_branch(&self) -> bool {
        self.depth > 0
    }

    /// First non-empty line of content, trimmed
    pub fn first_line(&self) -> &str {
        self.content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("")
    }
}
