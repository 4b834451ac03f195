//! Resumable ingestion from an append-only source stream.
//!
//! Each poll reads one chunk past the cursor, appends it to the spine as a
//! single node, and advances the cursor in memory. The cursor only becomes
//! durable when the owner persists it after the tree snapshot, so delivery
//! is at-least-once: a crash after reading but before persisting re-ingests
//! the same chunk. Duplicates are not filtered.

pub mod adapter;
mod cursor;
mod source;

pub use adapter::{AdapterChain, JsonChatAdapter, PrefixedChatAdapter, Record, RecordAdapter};
pub use cursor::{Cursor, CURSOR_FORMAT_VERSION};
pub use source::{FileSource, SourceDelta, SourceReader};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::IngestConfig;
use crate::error::Result;
use crate::id::NodeId;
use crate::tree::Tree;

/// What a single poll did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestOutcome {
    /// Spine node created from the chunk, if it carried any text
    pub node: Option<NodeId>,
    pub bytes_consumed: u64,
    pub rewound: bool,
}

/// Feeds one source stream into a tree
pub struct IngestionTracker {
    reader: Box<dyn SourceReader>,
    source: PathBuf,
    max_chunk_bytes: usize,
}

impl std::fmt::Debug for IngestionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionTracker")
            .field("source", &self.source)
            .field("max_chunk_bytes", &self.max_chunk_bytes)
            .finish()
    }
}

impl IngestionTracker {
    pub fn new(reader: Box<dyn SourceReader>, source: &Path, max_chunk_bytes: usize) -> Self {
        Self {
            reader,
            source: source.to_path_buf(),
            max_chunk_bytes: max_chunk_bytes.max(1),
        }
    }

    /// Tracker over a newline-delimited file with the standard adapters
    pub fn for_file(source: &Path, max_chunk_bytes: usize) -> Self {
        Self::new(Box::new(FileSource::default()), source, max_chunk_bytes)
    }

    /// Tracker for the configured source, if any
    pub fn from_config(config: &IngestConfig) -> Option<Self> {
        config
            .source
            .as_deref()
            .map(|source| Self::for_file(source, config.max_chunk_bytes))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Read the next chunk and append it as the new spine head
    #[tracing::instrument(skip(self, tree, cursor), fields(source = %self.source.display(), offset = cursor.offset))]
    pub fn poll(
        &self,
        tree: &mut Tree,
        cursor: &mut Cursor,
        now: DateTime<Utc>,
    ) -> Result<IngestOutcome> {
        if !cursor.tracks(&self.source) {
            if cursor.source.is_some() {
                tracing::info!("source changed, starting a new cursor");
            }
            *cursor = Cursor::for_source(&self.source);
        }

        let delta = self
            .reader
            .read(&self.source, cursor.offset, self.max_chunk_bytes)?;
        if delta.rewound {
            cursor.rewind();
        }

        let mut outcome = IngestOutcome {
            node: None,
            bytes_consumed: delta.bytes_consumed,
            rewound: delta.rewound,
        };

        if delta.bytes_consumed == 0 {
            return Ok(outcome);
        }

        if delta.text.trim().is_empty() {
            cursor.skip_to(delta.new_offset);
            tracing::debug!(new_offset = delta.new_offset, "chunk had no text");
            return Ok(outcome);
        }

        let id = tree.append_spine_node_at(delta.text, now);
        cursor.commit(delta.new_offset, id.clone(), now);
        tracing::info!(node_id = %id, bytes = delta.bytes_consumed, new_offset = delta.new_offset, "ingested chunk");
        outcome.node = Some(id);
        Ok(outcome)
    }
}
