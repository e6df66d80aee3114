//! Batch and snapshot engines layered over a shared, lock-guarded
//! [`ordkv_storage::OrderedMap`].

#![warn(missing_docs)]

pub mod batch;
pub mod snapshot;

pub use batch::{Batch, Savepoint};
pub use snapshot::Snapshot;
