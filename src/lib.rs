//! An embedded, ordered key-value store with pluggable comparators,
//! nested-savepoint batches, and snapshot isolation.
//!
//! [`Store`] ties together the four core subsystems: an
//! [`ordkv_storage::OrderedMap`] guarded by a single lock, a
//! [`ordkv_concurrency::Batch`]/[`ordkv_concurrency::Snapshot`] pair layered
//! over it, and [`ordkv_durability`]'s codec for optional on-disk
//! persistence. Everything else in this crate — [`StoreOptions`] — only
//! configures how a `Store` is opened.

#![warn(missing_docs)]

mod options;

pub use options::StoreOptions;

pub use ordkv_concurrency::{Batch, Savepoint, Snapshot};
pub use ordkv_core::{
    byte_successor, default_comparator, Comparator, Compression, DecompressError, Entry, Error,
    FileSystem, IterOptions, Key, LexicographicComparator, Lz4Compression, NoopCompression,
    NumericStringComparator, OsFileSystem, Result, ReverseComparator, SharedComparator, Value,
};
pub use ordkv_storage::{Cursor, OrderedMap};

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// The embedded store. Owns the live [`OrderedMap`] and the adapters it was
/// opened with; everything else (batches, snapshots, flush) is a thin
/// wrapper around that shared state.
pub struct Store {
    map: Arc<RwLock<OrderedMap>>,
    path: Option<PathBuf>,
    filesystem: Arc<dyn FileSystem>,
    compression: Arc<dyn Compression>,
    comparator: SharedComparator,
    closed: AtomicBool,
}

impl Store {
    /// Open (or create) a store per `options`.
    ///
    /// If `options` names a path that already exists, its contents are
    /// loaded; otherwise the store starts empty. Loading a file written
    /// under a different comparator still succeeds — see §4.4 — but is
    /// only efficient when the comparators agree.
    pub fn open(options: StoreOptions) -> Result<Self> {
        let comparator = options.comparator_handle();
        let filesystem = options.filesystem_handle();
        let compression = options.compression_handle();
        let path = options.path().map(|p| p.to_path_buf());

        let map = match &path {
            Some(p) => ordkv_durability::load(p, comparator.clone(), filesystem.as_ref(), compression.as_ref())?
                .unwrap_or_else(|| OrderedMap::new(comparator.clone())),
            None => OrderedMap::new(comparator.clone()),
        };

        Ok(Self {
            map: Arc::new(RwLock::new(map)),
            path,
            filesystem,
            compression,
            comparator,
            closed: AtomicBool::new(false),
        })
    }

    fn check_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::ClosedStore);
        }
        Ok(())
    }

    /// Insert or overwrite `key` with `value`. Post-condition: `get(key) ==
    /// Some(value)`.
    pub fn put(&self, key: impl Into<Key>, value: impl Into<Value>) -> Result<()> {
        self.check_open()?;
        self.map.write().insert(key.into(), value.into());
        Ok(())
    }

    /// The current value for `key`, or `None` if absent.
    pub fn get(&self, key: &[u8]) -> Result<Option<Value>> {
        self.check_open()?;
        Ok(self.map.read().get(key).cloned())
    }

    /// Remove `key`. Returns true iff it was present before the call.
    pub fn delete(&self, key: &[u8]) -> Result<bool> {
        self.check_open()?;
        Ok(self.map.write().remove(key))
    }

    /// True iff `key` is present.
    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        self.check_open()?;
        Ok(self.map.read().contains(key))
    }

    /// The number of live entries.
    pub fn len(&self) -> Result<usize> {
        self.check_open()?;
        Ok(self.map.read().len())
    }

    /// True iff the store has no entries.
    pub fn is_empty(&self) -> Result<bool> {
        self.check_open()?;
        Ok(self.map.read().is_empty())
    }

    /// Begin a new [`Batch`] of buffered writes against this store.
    pub fn batch(&self) -> Result<Batch> {
        self.check_open()?;
        Ok(Batch::new(self.map.clone()))
    }

    /// Take an immutable, point-in-time [`Snapshot`] of the current state.
    pub fn snapshot(&self) -> Result<Snapshot> {
        self.check_open()?;
        Ok(Snapshot::new(&self.map))
    }

    /// Serialize the current state to the configured path. A no-op for
    /// in-memory stores.
    ///
    /// Atomic with respect to crashes: the new image is written to a
    /// temporary sibling and then renamed over the target, so a failed
    /// flush never corrupts an existing file.
    pub fn flush(&self) -> Result<()> {
        self.check_open()?;
        let Some(path) = &self.path else {
            return Ok(());
        };
        let guard = self.map.read();
        ordkv_durability::flush(path, &guard, self.filesystem.as_ref(), self.compression.as_ref())
    }

    /// Flush (if persistent) and mark the store closed. Idempotent: calling
    /// `close` more than once is harmless, and does not re-flush.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        if let Some(path) = &self.path {
            let guard = self.map.read();
            ordkv_durability::flush(path, &guard, self.filesystem.as_ref(), self.compression.as_ref())?;
        }
        Ok(())
    }

    /// A cursor over the live store per `opts`. See [`IterOptions`] for the
    /// available range/prefix/reverse/limit/skip combinations.
    pub fn iterate(&self, opts: &IterOptions) -> Result<Vec<Entry>> {
        self.check_open()?;
        let guard = self.map.read();
        Ok(Cursor::new(&guard, opts).collect())
    }

    /// The comparator this store was opened with.
    pub fn comparator(&self) -> &SharedComparator {
        &self.comparator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s1_forward_and_reverse_iteration() {
        let store = Store::open(StoreOptions::in_memory()).unwrap();
        store.put(b"a".to_vec(), b"1".to_vec()).unwrap();
        store.put(b"c".to_vec(), b"3".to_vec()).unwrap();
        store.put(b"b".to_vec(), b"2".to_vec()).unwrap();

        let forward = store.iterate(&IterOptions::new()).unwrap();
        assert_eq!(
            forward,
            vec![
                (b"a".to_vec(), b"1".to_vec()),
                (b"b".to_vec(), b"2".to_vec()),
                (b"c".to_vec(), b"3".to_vec()),
            ]
        );

        let reverse = store.iterate(&IterOptions::new().reversed()).unwrap();
        let mut expected = forward.clone();
        expected.reverse();
        assert_eq!(reverse, expected);
    }

    #[test]
    fn scenario_s2_snapshot_isolation() {
        let store = Store::open(StoreOptions::in_memory()).unwrap();
        store.put(b"a".to_vec(), b"1".to_vec()).unwrap();
        store.put(b"c".to_vec(), b"3".to_vec()).unwrap();
        store.put(b"b".to_vec(), b"2".to_vec()).unwrap();

        let snap = store.snapshot().unwrap();
        store.put(b"a".to_vec(), b"9".to_vec()).unwrap();
        store.delete(b"b").unwrap();

        let snap_entries: Vec<_> = snap.iterate(&IterOptions::new()).collect();
        assert_eq!(
            snap_entries,
            vec![
                (b"a".to_vec(), b"1".to_vec()),
                (b"b".to_vec(), b"2".to_vec()),
                (b"c".to_vec(), b"3".to_vec()),
            ]
        );

        let live = store.iterate(&IterOptions::new()).unwrap();
        assert_eq!(live, vec![(b"a".to_vec(), b"9".to_vec()), (b"c".to_vec(), b"3".to_vec())]);
    }

    #[test]
    fn scenario_s3_batch_with_savepoint() {
        let store = Store::open(StoreOptions::in_memory()).unwrap();
        let mut batch = store.batch().unwrap();
        batch.put(b"x".to_vec(), b"1".to_vec());
        batch.put(b"y".to_vec(), b"2".to_vec());
        let sp = batch.create_savepoint();
        batch.put(b"y".to_vec(), b"99".to_vec());
        batch.rollback_to_savepoint(sp).unwrap();
        batch.put(b"z".to_vec(), b"3".to_vec());
        batch.commit().unwrap();

        assert_eq!(store.get(b"x").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(b"y").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.get(b"z").unwrap(), Some(b"3".to_vec()));
    }

    #[test]
    fn scenario_s4_persistence_roundtrip_with_default_lz4() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.kvdb");

        {
            let store = Store::open(StoreOptions::at_path(&path)).unwrap();
            for i in 0..5 {
                let key = format!("k{i}").into_bytes();
                let value = vec![b'A'; 1000];
                store.put(key, value).unwrap();
            }
            store.close().unwrap();
        }

        let file_len = std::fs::metadata(&path).unwrap().len();
        assert!(file_len < 5000, "expected compression to beat raw size, got {file_len}");

        let reopened = Store::open(StoreOptions::at_path(&path)).unwrap();
        assert_eq!(reopened.len().unwrap(), 5);
        for i in 0..5 {
            let key = format!("k{i}").into_bytes();
            assert_eq!(reopened.get(&key).unwrap(), Some(vec![b'A'; 1000]));
        }
    }

    #[test]
    fn scenario_s5_reverse_comparator() {
        let store = Store::open(
            StoreOptions::in_memory().comparator(Arc::new(ReverseComparator) as SharedComparator),
        )
        .unwrap();
        store.put(b"1".to_vec(), vec![]).unwrap();
        store.put(b"2".to_vec(), vec![]).unwrap();
        store.put(b"10".to_vec(), vec![]).unwrap();

        let keys: Vec<_> = store
            .iterate(&IterOptions::new())
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"2".to_vec(), b"10".to_vec(), b"1".to_vec()]);
    }

    #[test]
    fn scenario_s6_prefix_scan() {
        let store = Store::open(StoreOptions::in_memory()).unwrap();
        for i in 0..100 {
            let key = format!("user_{i:03}").into_bytes();
            store.put(key, vec![]).unwrap();
        }

        let matches = store
            .iterate(&IterOptions::new().with_prefix(b"user_05".to_vec()))
            .unwrap();
        let expected: Vec<_> = (50..60)
            .map(|i| (format!("user_{i:03}").into_bytes(), Vec::new()))
            .collect();
        assert_eq!(matches, expected);
    }

    #[test]
    fn close_is_idempotent_and_flushes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.kvdb");
        let store = Store::open(StoreOptions::at_path(&path)).unwrap();
        store.put(b"k".to_vec(), b"v".to_vec()).unwrap();
        store.close().unwrap();
        store.close().unwrap();
        assert!(matches!(store.put(b"k2".to_vec(), b"v2".to_vec()), Err(Error::ClosedStore)));
    }

    #[test]
    fn delete_idempotence() {
        let store = Store::open(StoreOptions::in_memory()).unwrap();
        store.put(b"k".to_vec(), b"v".to_vec()).unwrap();
        assert!(store.delete(b"k").unwrap());
        assert!(!store.delete(b"k").unwrap());
        assert_eq!(store.get(b"k").unwrap(), None);
    }
}
