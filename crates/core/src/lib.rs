//! Core types and adapter traits for the ordered key-value store.
//!
//! This crate defines the leaves of the system (see the architecture table
//! in the workspace `DESIGN.md`): the [`Comparator`] that decides key
//! order, the [`FileSystem`] and [`Compression`] adapters the persistence
//! layer is built on, the shared [`Key`]/[`Value`]/[`Entry`] aliases, and
//! the unified [`Error`] type. It has no notion of a "store" — that's
//! `ordkv-storage`'s job.

#![warn(missing_docs)]

pub mod comparator;
pub mod compression;
pub mod error;
pub mod fs;
pub mod iter_opts;

pub use comparator::{
    default_comparator, Comparator, LexicographicComparator, NumericStringComparator,
    ReverseComparator, SharedComparator,
};
pub use compression::{Compression, DecompressError, Lz4Compression, NoopCompression};
pub use error::{Error, Result};
pub use fs::{temp_sibling, FileSystem, OsFileSystem};
pub use iter_opts::{byte_successor, Entry, IterOptions, Key, Value};
