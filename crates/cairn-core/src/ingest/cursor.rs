use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// Current cursor format version
pub const CURSOR_FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    CURSOR_FORMAT_VERSION
}

/// How far into the source stream ingestion has been committed.
///
/// Persisted next to the tree snapshot, and always after it: a crash between
/// the two writes re-reads the last chunk rather than losing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Stream this offset belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Byte offset just past the last committed chunk
    #[serde(default)]
    pub offset: u64,
    /// Node produced by the last committed chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_node_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committed_at: Option<DateTime<Utc>>,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            version: CURSOR_FORMAT_VERSION,
            source: None,
            offset: 0,
            last_node_id: None,
            committed_at: None,
        }
    }
}

impl Cursor {
    pub fn for_source(source: &Path) -> Self {
        Self {
            source: Some(source.to_path_buf()),
            ..Default::default()
        }
    }

    /// Whether this cursor tracks `source`
    pub fn tracks(&self, source: &Path) -> bool {
        self.source.as_deref() == Some(source)
    }

    /// Record that everything before `offset` now lives in `node`
    pub fn commit(&mut self, offset: u64, node: NodeId, at: DateTime<Utc>) {
        self.offset = offset;
        self.last_node_id = Some(node);
        self.committed_at = Some(at);
    }

    /// Advance past content that produced no node (blank or filtered records)
    pub fn skip_to(&mut self, offset: u64) {
        self.offset = offset;
    }

    /// Start over from the beginning of the stream (rotation or truncation)
    pub fn rewind(&mut self) {
        self.offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_source_starts_at_zero() {
        let cursor = Cursor::for_source(Path::new("/logs/a.log"));
        assert_eq!(cursor.offset, 0);
        assert!(cursor.tracks(Path::new("/logs/a.log")));
        assert!(!cursor.tracks(Path::new("/logs/b.log")));
        assert!(cursor.last_node_id.is_none());
    }

    #[test]
    fn test_commit_records_node() {
        let mut cursor = Cursor::for_source(Path::new("/logs/a.log"));
        let node = NodeId::new("cn-1").unwrap();
        cursor.commit(42, node.clone(), Utc::now());
        assert_eq!(cursor.offset, 42);
        assert_eq!(cursor.last_node_id, Some(node));
        cursor.rewind();
        assert_eq!(cursor.offset, 0);
    }

    #[test]
    fn test_default_deserializes_from_empty_object() {
        let cursor: Cursor = serde_json::from_str("{}").unwrap();
        assert_eq!(cursor.version, CURSOR_FORMAT_VERSION);
        assert_eq!(cursor.offset, 0);
    }
}
