//! Shared cursor-construction options.
//!
//! `ordkv-storage` and `ordkv-concurrency` both build cursors over an
//! ordered map (live, or a snapshot's frozen copy); this type is the common
//! options struct threaded through both so that range/reverse/prefix/limit/
//! skip compose identically regardless of which one is iterating.

use std::ops::Bound;

/// The key type used throughout the store: an opaque, finite byte string.
pub type Key = Vec<u8>;

/// The value type used throughout the store: an opaque, finite byte string.
pub type Value = Vec<u8>;

/// A live (key, value) pair.
pub type Entry = (Key, Value);

/// Options accepted by `iterate()`. Construct via [`IterOptions::new`] and
/// the builder methods, or `IterOptions::default()` for an unbounded
/// forward scan of the whole map.
#[derive(Debug, Clone, Default)]
pub struct IterOptions {
    /// Inclusive lower bound, or unbounded if `None`.
    pub start: Option<Key>,
    /// Exclusive upper bound, or unbounded if `None`.
    pub end: Option<Key>,
    /// Byte-prefix filter. When set, is equivalent to `range[P, P+)` per
    /// §4.7, with a byte-level `starts_with` filter layered on top so the
    /// result is correct even when the comparator disagrees with
    /// lexicographic order on where `P+` falls.
    pub prefix: Option<Key>,
    /// Step in decreasing comparator order instead of increasing.
    pub reverse: bool,
    /// Discard this many matching entries before the first yielded one.
    /// Applied before `limit`.
    pub limit: Option<usize>,
    /// Yield at most this many entries.
    pub skip: usize,
}

impl IterOptions {
    /// An unbounded forward scan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inclusive lower bound.
    pub fn start(mut self, key: impl Into<Key>) -> Self {
        self.start = Some(key.into());
        self
    }

    /// Set the exclusive upper bound.
    pub fn end(mut self, key: impl Into<Key>) -> Self {
        self.end = Some(key.into());
        self
    }

    /// Restrict to keys beginning with `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<Key>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Step in decreasing comparator order.
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Cap the number of entries yielded.
    pub fn limited(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Discard the first `skip` matching entries.
    pub fn skipped(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Resolve `start`/`end`/`prefix` into the `(Bound, Bound)` pair a range
    /// scan should use, per §4.7 (`prefix P` is `range[P, P+)`). When both
    /// `prefix` and explicit `start`/`end` are set, prefix takes priority —
    /// it is the more specific request.
    pub fn resolve_bounds(&self) -> (Bound<Key>, Bound<Key>) {
        if let Some(prefix) = &self.prefix {
            let lower = Bound::Included(prefix.clone());
            let upper = match byte_successor(prefix) {
                Some(succ) => Bound::Excluded(succ),
                None => Bound::Unbounded,
            };
            return (lower, upper);
        }

        let lower = match &self.start {
            Some(k) => Bound::Included(k.clone()),
            None => Bound::Unbounded,
        };
        let upper = match &self.end {
            Some(k) => Bound::Excluded(k.clone()),
            None => Bound::Unbounded,
        };
        (lower, upper)
    }
}

/// The smallest byte sequence greater than every sequence beginning with
/// `prefix`, under lexicographic order on unsigned bytes — i.e. `prefix`
/// with its last non-`0xFF` byte incremented and every trailing `0xFF`
/// byte dropped. Returns `None` when `prefix` is empty or consists
/// entirely of `0xFF` bytes, meaning there is no finite successor and the
/// upper bound is unbounded.
pub fn byte_successor(prefix: &[u8]) -> Option<Key> {
    let mut successor = prefix.to_vec();
    while let Some(&last) = successor.last() {
        if last == 0xFF {
            successor.pop();
        } else {
            *successor.last_mut().unwrap() += 1;
            return Some(successor);
        }
    }
    None
}
