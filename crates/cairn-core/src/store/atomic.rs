//! Write-to-temp-then-rename file replacement

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{CairnError, Result};

/// Atomically replace `path` with `bytes`.
///
/// The temp file lives in the destination directory so the final rename
/// never crosses filesystems. Readers see either the old file or the new
/// one, and a crash mid-write leaves the old file in place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .map_err(|e| CairnError::io_operation("create directory", dir.display(), e))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| CairnError::io_operation("create temp file in", dir.display(), e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| CairnError::io_operation("write", tmp.path().display(), e))?;
    tmp.persist(path)
        .map_err(|e| CairnError::io_operation("rename into", path.display(), e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_and_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("file.txt");

        write_atomic(&path, b"first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        // no temp files left behind
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_atomic_into_directory_path_fails_cleanly() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let err = write_atomic(&target, b"data").unwrap_err();
        assert!(err.is_transient());
        assert!(target.join("keep").exists());
    }
}
