//! Filesystem indirection.
//!
//! The persistence codec never touches `std::fs` directly; it goes through
//! a [`FileSystem`] so that tests can swap in an in-memory or
//! operation-logging implementation (see `OsFileSystem` for the default,
//! and the `tests/` tree for a recording fake used to assert atomic
//! replace-on-flush behavior).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Indirection over the handful of filesystem operations the store needs.
///
/// `write` must create missing parent directories, mirroring what a real
/// embedded store needs when `path` nests under a directory that hasn't
/// been created yet.
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Read the full contents of `path`. Returns
    /// `Err(io::ErrorKind::NotFound)` when absent.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write `data` to `path`, creating parent directories as needed.
    /// Overwrites an existing file.
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// True iff `path` names an existing file.
    fn exists(&self, path: &Path) -> bool;

    /// Remove `path`. A no-op (not an error) if it is already absent.
    fn delete(&self, path: &Path) -> io::Result<()>;

    /// Create `path` and any missing ancestors. Idempotent.
    fn mkdir(&self, path: &Path) -> io::Result<()>;

    /// Atomically replace `path` with `tmp_path`'s contents. The default
    /// implementation is `rename`, which is atomic on the same filesystem;
    /// this is the step that makes `flush()` crash-safe.
    fn rename(&self, tmp_path: &Path, path: &Path) -> io::Result<()> {
        fs::rename(tmp_path, path)
    }
}

/// The default, OS-backed [`FileSystem`].
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, data)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn delete(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn mkdir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}

/// Returns a sibling temporary path used as the write target before the
/// atomic rename in `flush()`, e.g. `foo.kvdb` -> `.foo.kvdb.tmp`.
pub fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "db".to_string());
    let tmp_name = format!(".{file_name}.tmp");
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(tmp_name),
        _ => PathBuf::from(tmp_name),
    }
}
