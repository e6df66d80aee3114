//! The batch engine: a buffered, atomic group of writes with a savepoint
//! stack for partial rollback before commit.
//!
//! There is no separate "simple" and "advanced" batch type. A plain batch
//! that never calls [`Batch::create_savepoint`] *is* the simple tier — the
//! savepoint stack costs nothing when unused, so splitting the two into
//! distinct types would just be two names for the same code path.
//!
//! Rollback-on-abnormal-exit (§4.5, §5) falls out of ownership rather than
//! a `Drop` impl doing real work: the only thing that mutates the live map
//! is [`Batch::commit`], so a batch that goes out of scope without being
//! committed simply has its buffered operations dropped, untouched.

use std::sync::Arc;

use ordkv_core::{Error, Key, Result, Value};
use ordkv_storage::OrderedMap;
use parking_lot::RwLock;

/// One buffered write, applied to the live map at commit time.
#[derive(Debug, Clone)]
enum BatchOp {
    Put(Key, Value),
    Delete(Key),
}

/// An opaque handle to a position in a batch's operation buffer, returned
/// by [`Batch::create_savepoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Savepoint(u64);

/// A buffered, atomic group of `put`/`delete` operations with a savepoint
/// stack.
///
/// Savepoints nest strictly: rolling back to savepoint `S` invalidates
/// every savepoint created after `S` (§3). An uncommitted batch never
/// observably mutates the store it was created from — operations only
/// reach the live [`OrderedMap`] inside [`Batch::commit`]'s single write-lock
/// critical section, so no reader can see a partially applied batch.
pub struct Batch {
    target: Arc<RwLock<OrderedMap>>,
    ops: Vec<BatchOp>,
    /// Stack of `(handle id, buffer length at creation)`.
    savepoints: Vec<(u64, usize)>,
    next_savepoint_id: u64,
    resolved: bool,
}

impl Batch {
    /// Create an empty batch that will commit against `target`.
    pub fn new(target: Arc<RwLock<OrderedMap>>) -> Self {
        Self {
            target,
            ops: Vec::new(),
            savepoints: Vec::new(),
            next_savepoint_id: 0,
            resolved: false,
        }
    }

    /// Buffer a `put`. Not visible to readers until `commit`.
    pub fn put(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        self.ops.push(BatchOp::Put(key.into(), value.into()));
    }

    /// Buffer a `delete`. Not visible to readers until `commit`.
    pub fn delete(&mut self, key: impl Into<Key>) {
        self.ops.push(BatchOp::Delete(key.into()));
    }

    /// The number of buffered operations, including any since truncated by
    /// a rollback.
    pub fn pending_len(&self) -> usize {
        self.ops.len()
    }

    /// Push a savepoint marker at the current buffer length.
    pub fn create_savepoint(&mut self) -> Savepoint {
        let id = self.next_savepoint_id;
        self.next_savepoint_id += 1;
        self.savepoints.push((id, self.ops.len()));
        Savepoint(id)
    }

    /// Truncate the buffer to its length when `savepoint` was created, and
    /// pop `savepoint` and every savepoint created after it.
    ///
    /// Fails with [`Error::InvalidSavepoint`] if `savepoint` is not on the
    /// current stack — either it was already rolled back past, or it
    /// belongs to a different batch.
    pub fn rollback_to_savepoint(&mut self, savepoint: Savepoint) -> Result<()> {
        let idx = self
            .savepoints
            .iter()
            .position(|(id, _)| *id == savepoint.0)
            .ok_or(Error::InvalidSavepoint)?;
        let len_at_savepoint = self.savepoints[idx].1;
        self.ops.truncate(len_at_savepoint);
        self.savepoints.truncate(idx);
        Ok(())
    }

    /// Discard the entire buffer and savepoint stack.
    pub fn rollback(mut self) {
        self.ops.clear();
        self.savepoints.clear();
        self.resolved = true;
    }

    /// Apply the buffered operations to the target map, in insertion order,
    /// inside a single write-lock critical section — either all of them
    /// land, or (since nothing here can fail once the lock is held) none
    /// do, and no reader observes an intermediate state.
    pub fn commit(mut self) -> Result<()> {
        let ops = std::mem::take(&mut self.ops);
        {
            let mut map = self.target.write();
            for op in ops {
                match op {
                    BatchOp::Put(k, v) => {
                        map.insert(k, v);
                    }
                    BatchOp::Delete(k) => {
                        map.remove(&k);
                    }
                }
            }
        }
        self.resolved = true;
        Ok(())
    }
}

impl Drop for Batch {
    fn drop(&mut self) {
        if !self.resolved && !self.ops.is_empty() {
            tracing::debug!(
                pending_ops = self.ops.len(),
                "batch dropped without commit; rolling back"
            );
        }
    }
}
