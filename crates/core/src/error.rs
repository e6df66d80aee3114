//! Error types for the ordered key-value store.
//!
//! `NotFound` is deliberately absent here: lookups of an absent key are
//! signalled by returning `Option::None`, not by an error variant. Everything
//! else that can go wrong propagates through [`Error`].

use std::io;
use thiserror::Error;

/// Result type alias used across the store.
pub type Result<T> = std::result::Result<T, Error>;

/// Error conditions surfaced by the ordered key-value store.
#[derive(Debug, Error)]
pub enum Error {
    /// A filesystem adapter call (read/write/exists/delete/mkdir/rename) failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The on-disk file's magic, version, flags, or length fields were
    /// inconsistent with the expected layout.
    #[error("format error: {0}")]
    Format(String),

    /// The compression adapter rejected a payload as corrupt.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// A savepoint handle was rolled back to after it (or an ancestor) was
    /// already popped off the batch's savepoint stack.
    #[error("invalid savepoint")]
    InvalidSavepoint,

    /// An operation was attempted on a store after `close()`.
    #[error("store is closed")]
    ClosedStore,

    /// The configured comparator violated totality, antisymmetry, or
    /// transitivity. Detected on a best-effort basis only.
    #[error("comparator invariant violated: {0}")]
    InvariantViolation(String),
}
