//! Disk I/O helpers: strict and lenient reads, and the temp-file + rename
//! write.
//!
//! Rename-over is close to atomic on local filesystems. Network shares and
//! FAT32 give no such guarantee.

use crate::error::{Error, Result};
use crate::item::{ItemId, Quantity};
use crate::serializer::Serializer;
use std::io::Write;
use std::path::Path;

/// Read and decode `path`. A missing file is an error.
pub fn read_entries<S: Serializer>(path: &Path, serializer: &S) -> Result<Vec<(ItemId, Quantity)>> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
    serializer.deserialize(&bytes)
}

/// Like [`read_entries`], but a missing or empty file reads as no entries.
pub fn read_entries_or_empty<S: Serializer>(
    path: &Path,
    serializer: &S,
) -> Result<Vec<(ItemId, Quantity)>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::Io(format!("{}: {e}", path.display()))),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serializer.deserialize(&bytes)
}

/// Write `bytes` to a sibling `<path>.tmp`, sync it, then rename over `path`.
/// A crash mid-write leaves the previous file intact.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    let mut file = std::fs::File::create(&tmp)
        .map_err(|e| Error::Io(format!("{}: {e}", tmp.display())))?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        Error::Io(format!("{}: {e}", path.display()))
    })
}
