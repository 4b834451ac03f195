//! Snapshot persistence
//!
//! The data dir holds three files, all replaced atomically:
//! - the tree snapshot (`tree.json`)
//! - the ingestion cursor (`cursor.json`), always written after the snapshot
//! - the rendered briefing (`BRIEFING.md`)

mod atomic;

pub use atomic::write_atomic;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PathsConfig;
use crate::error::{CairnError, Result};
use crate::ingest::Cursor;
use crate::tree::{Tree, TREE_FORMAT_VERSION};

/// Resolved file locations for one agent's memory
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    snapshot: PathBuf,
    cursor: PathBuf,
    briefing: PathBuf,
}

impl Store {
    pub fn new(root: &Path, paths: &PathsConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            snapshot: paths.snapshot_in(root),
            cursor: paths.cursor_in(root),
            briefing: paths.briefing_in(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot
    }

    pub fn cursor_path(&self) -> &Path {
        &self.cursor
    }

    pub fn briefing_path(&self) -> &Path {
        &self.briefing
    }

    #[tracing::instrument(skip(self, tree), fields(path = %self.snapshot.display(), nodes = tree.len()))]
    pub fn save_tree(&self, tree: &Tree) -> Result<()> {
        save_tree(&self.snapshot, tree)
    }

    pub fn load_tree(&self) -> Result<Option<Tree>> {
        load_tree(&self.snapshot)
    }

    /// Load the snapshot; absence and decode errors both yield a fresh tree
    pub fn load_tree_or_default(&self) -> Result<Tree> {
        match self.load_tree() {
            Ok(Some(tree)) => Ok(tree),
            Ok(None) => Ok(Tree::new()),
            Err(CairnError::Decode { path, reason }) => {
                tracing::warn!(path = %path.display(), %reason, "snapshot unreadable, starting fresh");
                Ok(Tree::new())
            }
            Err(e) => Err(e),
        }
    }

    pub fn save_cursor(&self, cursor: &Cursor) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cursor)?;
        write_atomic(&self.cursor, &bytes)
    }

    /// Load the cursor; absence and decode errors both yield a zero cursor
    pub fn load_cursor(&self) -> Result<Cursor> {
        let bytes = match fs::read(&self.cursor) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Cursor::default()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(cursor) => Ok(cursor),
            Err(e) => {
                tracing::warn!(path = %self.cursor.display(), error = %e, "cursor unreadable, re-reading source from the start");
                Ok(Cursor::default())
            }
        }
    }

    pub fn write_briefing(&self, text: &str) -> Result<()> {
        write_atomic(&self.briefing, text.as_bytes())
    }
}

/// Serialize the tree and atomically replace `path`
pub fn save_tree(path: &Path, tree: &Tree) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(tree)?;
    write_atomic(path, &bytes)
}

/// Read a snapshot. `Ok(None)` when the file does not exist.
pub fn load_tree(path: &Path) -> Result<Option<Tree>> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CairnError::io_operation("read", path.display(), e)),
    };

    let tree: Tree = serde_json::from_slice(&bytes).map_err(|e| CairnError::decode(path, e))?;
    if tree.version() > TREE_FORMAT_VERSION {
        return Err(CairnError::decode(
            path,
            format!(
                "snapshot version {} is newer than supported version {}",
                tree.version(),
                TREE_FORMAT_VERSION
            ),
        ));
    }
    Ok(Some(tree))
}
