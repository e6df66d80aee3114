//! Construction options for [`crate::Store`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ordkv_core::{default_comparator, Compression, FileSystem, Lz4Compression, OsFileSystem, SharedComparator};

/// Where a store keeps its data: a backing file, or nowhere (memory-only).
enum Backing {
    Path(PathBuf),
    InMemory,
}

/// Construction options for opening or creating a [`crate::Store`].
///
/// `path` and `in_memory` are mutually exclusive; the last one set wins.
/// Everything else defaults per the construction-options table: lexicographic
/// comparator, OS-backed filesystem, LZ4 compression.
pub struct StoreOptions {
    backing: Backing,
    comparator: SharedComparator,
    filesystem: Arc<dyn FileSystem>,
    compression: Arc<dyn Compression>,
}

impl StoreOptions {
    /// A persistent store backed by `path`.
    pub fn at_path(path: impl AsRef<Path>) -> Self {
        Self {
            backing: Backing::Path(path.as_ref().to_path_buf()),
            ..Self::defaults()
        }
    }

    /// A memory-only store; nothing is ever read from or written to disk.
    pub fn in_memory() -> Self {
        Self {
            backing: Backing::InMemory,
            ..Self::defaults()
        }
    }

    fn defaults() -> Self {
        Self {
            backing: Backing::InMemory,
            comparator: default_comparator(),
            filesystem: Arc::new(OsFileSystem),
            compression: Arc::new(Lz4Compression),
        }
    }

    /// Override the key ordering. Only meaningful on a fresh or empty store
    /// — the caller is responsible for not switching orderings on a store
    /// with existing data under a different order (§4.1).
    pub fn comparator(mut self, comparator: SharedComparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Override the filesystem adapter. Mostly useful for tests.
    pub fn filesystem(mut self, filesystem: Arc<dyn FileSystem>) -> Self {
        self.filesystem = filesystem;
        self
    }

    /// Override the compression adapter. Pass [`ordkv_core::NoopCompression`]
    /// to disable compression.
    pub fn compression(mut self, compression: Arc<dyn Compression>) -> Self {
        self.compression = compression;
        self
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::Path(p) => Some(p),
            Backing::InMemory => None,
        }
    }

    pub(crate) fn comparator_handle(&self) -> SharedComparator {
        self.comparator.clone()
    }

    pub(crate) fn filesystem_handle(&self) -> Arc<dyn FileSystem> {
        self.filesystem.clone()
    }

    pub(crate) fn compression_handle(&self) -> Arc<dyn Compression> {
        self.compression.clone()
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::defaults()
    }
}
