//! The ordered map and iterator factory.
//!
//! `ordkv-storage` owns the sorted in-memory structure
//! ([`OrderedMap`]) and the lazy cursor construction over it
//! ([`Cursor`]). It knows nothing about batches, snapshots, or disk — those
//! live in `ordkv-concurrency` and `ordkv-durability` respectively, both of
//! which depend on this crate for the map they operate over.

#![warn(missing_docs)]

pub mod cursor;
pub mod ordered_map;

pub use cursor::Cursor;
pub use ordered_map::{OrderedKey, OrderedMap};
