//! Ties the byte-level codec to a [`FileSystem`] adapter with
//! write-fsync-free, rename-based atomic replace semantics.
//!
//! `flush` never writes `path` directly: it writes the full file image to a
//! temporary sibling and only then renames it over `path`. A rename either
//! fully succeeds or fully fails, so a crash or I/O error mid-flush leaves
//! the previous `path` (if any) untouched — the atomicity §4.3 requires.

use std::path::Path;

use ordkv_core::{temp_sibling, Compression, FileSystem, Result, SharedComparator};
use ordkv_storage::OrderedMap;

use crate::codec::{decode_file, encode_file};

/// Load the store at `path`, if it exists. Returns `Ok(None)` when there is
/// no file to load (the caller should start from an empty map).
pub fn load(
    path: &Path,
    comparator: SharedComparator,
    fs: &dyn FileSystem,
    compression: &dyn Compression,
) -> Result<Option<OrderedMap>> {
    if !fs.exists(path) {
        return Ok(None);
    }
    let bytes = fs.read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "loading store from disk");
    decode_file(&bytes, comparator, compression).map(Some)
}

/// Serialize `map` to `path`, replacing any existing file atomically.
///
/// On failure (from either the temp-file write or the rename), the
/// in-progress temp file is best-effort cleaned up and `path` is left
/// exactly as it was before the call.
pub fn flush(
    path: &Path,
    map: &OrderedMap,
    fs: &dyn FileSystem,
    compression: &dyn Compression,
) -> Result<()> {
    let bytes = encode_file(map, compression);
    let tmp_path = temp_sibling(path);

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "flushing store to disk");

    fs.write(&tmp_path, &bytes).map_err(|e| {
        let _ = fs.delete(&tmp_path);
        e
    })?;

    fs.rename(&tmp_path, path).map_err(|e| {
        let _ = fs.delete(&tmp_path);
        e
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "flushed store to disk");
    Ok(())
}
