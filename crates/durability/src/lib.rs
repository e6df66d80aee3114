//! The persistence codec: serializes an [`ordkv_storage::OrderedMap`] to
//! and from a file, optionally compressed, with atomic replace-on-flush
//! durability.
//!
//! See `codec` for the byte-level file format (version 1) and
//! `file_store` for the write-fsync-free write-temp-then-rename flow that
//! wraps it.

#![warn(missing_docs)]

pub mod codec;
pub mod file_store;

pub use codec::{decode_file, encode_file};
pub use file_store::{flush, load};
