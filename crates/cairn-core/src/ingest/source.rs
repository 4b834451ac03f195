use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use super::adapter::AdapterChain;
use crate::error::{CairnError, Result};

/// New content read from a source stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDelta {
    /// Normalized text; may be empty even when bytes were consumed
    pub text: String,
    pub bytes_consumed: u64,
    /// Offset to resume from next time
    pub new_offset: u64,
    /// The stream was shorter than the requested offset and was re-read from 0
    pub rewound: bool,
}

/// Reads an append-only byte log from an offset
pub trait SourceReader {
    fn read(&self, path: &Path, offset: u64, max_bytes: usize) -> Result<SourceDelta>;
}

/// Reads a file of newline-delimited records.
///
/// Only complete lines are consumed; a trailing partial line is left for the
/// next read unless it alone fills the whole chunk.
#[derive(Debug, Default)]
pub struct FileSource {
    adapters: AdapterChain,
}

impl FileSource {
    pub fn new(adapters: AdapterChain) -> Self {
        Self { adapters }
    }
}

impl SourceReader for FileSource {
    fn read(&self, path: &Path, offset: u64, max_bytes: usize) -> Result<SourceDelta> {
        let mut file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "source not present yet");
                return Ok(SourceDelta {
                    new_offset: offset,
                    ..Default::default()
                });
            }
            Err(e) => return Err(CairnError::io_operation("open", path.display(), e)),
        };

        let len = file
            .metadata()
            .map_err(|e| CairnError::io_operation("stat", path.display(), e))?
            .len();

        let (start, rewound) = if len < offset {
            tracing::warn!(path = %path.display(), len, offset, "source shrank, re-reading from start");
            (0, true)
        } else {
            (offset, false)
        };

        file.seek(SeekFrom::Start(start))
            .map_err(|e| CairnError::io_operation("seek", path.display(), e))?;
        let mut buf = Vec::new();
        file.take(max_bytes as u64)
            .read_to_end(&mut buf)
            .map_err(|e| CairnError::io_operation("read", path.display(), e))?;

        let consumed = match buf.iter().rposition(|&b| b == b'\n') {
            Some(pos) => pos + 1,
            None if buf.len() >= max_bytes => forced_cut(&buf),
            None => 0,
        };

        let raw = String::from_utf8_lossy(&buf[..consumed]);
        Ok(SourceDelta {
            text: self.adapters.normalize(&raw),
            bytes_consumed: consumed as u64,
            new_offset: start + consumed as u64,
            rewound,
        })
    }
}

/// Where to split a line that alone fills the chunk: the last char boundary,
/// unless the bytes are not UTF-8 to begin with
fn forced_cut(buf: &[u8]) -> usize {
    match std::str::from_utf8(buf) {
        Ok(_) => buf.len(),
        Err(e) if e.error_len().is_none() && e.valid_up_to() > 0 => e.valid_up_to(),
        Err(_) => buf.len(),
    }
}
