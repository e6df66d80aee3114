//! The iterator factory: turns an [`IterOptions`] request into a lazy,
//! ordered [`Cursor`] over an [`OrderedMap`].
//!
//! Composition rules (§4.7): `skip` is applied before `limit`; `reverse`
//! flips both seek and step direction; `prefix P` is `range[P, P+)` with an
//! additional byte-level `starts_with` filter layered on top. That filter
//! is what keeps prefix scans correct even when the comparator disagrees
//! with byte order on where `P+` falls (§9's open question) — see
//! [`Cursor::new`] for how the two combine.

use std::ops::Bound;

use ordkv_core::{IterOptions, Key, Value};

use crate::ordered_map::OrderedMap;

/// A lazy, ordered traversal over entries bounded/filtered by
/// [`IterOptions`]. Cloning keys/values out as it steps, not up front —
/// constructing a `Cursor` does no work beyond resolving bounds.
pub struct Cursor<'a> {
    inner: Box<dyn Iterator<Item = (&'a [u8], &'a Value)> + 'a>,
    skip: usize,
    skipped: usize,
    limit: Option<usize>,
    yielded: usize,
}

impl<'a> Cursor<'a> {
    /// Build a cursor over `map` for `opts`.
    ///
    /// When a prefix is requested and the map's comparator is not
    /// byte-lexicographic, the computed `[P, P+)` range cannot be trusted
    /// to bound every true match (a non-lexicographic order can place a
    /// key starting with `P` outside that range), so the seek falls back
    /// to an unbounded forward scan and relies entirely on the
    /// `starts_with` filter for correctness. With the default lexicographic
    /// comparator the tight range is exact and the filter is a cheap
    /// defensive no-op.
    pub fn new(map: &'a OrderedMap, opts: &IterOptions) -> Self {
        let (lower, upper) = opts.resolve_bounds();
        let can_trust_range = opts.prefix.is_none() || map.comparator().is_lexicographic();
        let (lower, upper) = if can_trust_range {
            (lower, upper)
        } else {
            (Bound::Unbounded, Bound::Unbounded)
        };

        let forward = map.range_forward(lower, upper);
        let stepped: Box<dyn Iterator<Item = (&'a [u8], &'a Value)> + 'a> = if opts.reverse {
            Box::new(forward.rev())
        } else {
            Box::new(forward)
        };

        let filtered: Box<dyn Iterator<Item = (&'a [u8], &'a Value)> + 'a> =
            match opts.prefix.clone() {
                Some(prefix) => Box::new(stepped.filter(move |(k, _)| k.starts_with(&prefix))),
                None => stepped,
            };

        Cursor {
            inner: filtered,
            skip: opts.skip,
            skipped: 0,
            limit: opts.limit,
            yielded: 0,
        }
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = (Key, Value);

    fn next(&mut self) -> Option<Self::Item> {
        while self.skipped < self.skip {
            self.inner.next()?;
            self.skipped += 1;
        }
        if let Some(limit) = self.limit {
            if self.yielded >= limit {
                return None;
            }
        }
        let (k, v) = self.inner.next()?;
        self.yielded += 1;
        Some((k.to_vec(), v.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordkv_core::default_comparator;

    fn sample() -> OrderedMap {
        let mut map = OrderedMap::new(default_comparator());
        for (k, v) in [("a", "1"), ("b", "2"), ("c", "3")] {
            map.insert(k.as_bytes().to_vec(), v.as_bytes().to_vec());
        }
        map
    }

    #[test]
    fn forward_scan_s1() {
        let map = sample();
        let out: Vec<_> = Cursor::new(&map, &IterOptions::new()).collect();
        assert_eq!(
            out,
            vec![
                (b"a".to_vec(), b"1".to_vec()),
                (b"b".to_vec(), b"2".to_vec()),
                (b"c".to_vec(), b"3".to_vec()),
            ]
        );
    }

    #[test]
    fn reverse_scan_s1() {
        let map = sample();
        let out: Vec<_> = Cursor::new(&map, &IterOptions::new().reversed()).collect();
        assert_eq!(
            out,
            vec![
                (b"c".to_vec(), b"3".to_vec()),
                (b"b".to_vec(), b"2".to_vec()),
                (b"a".to_vec(), b"1".to_vec()),
            ]
        );
    }

    #[test]
    fn range_is_start_inclusive_end_exclusive() {
        let map = sample();
        let opts = IterOptions::new().start(b"b".to_vec()).end(b"c".to_vec());
        let out: Vec<_> = Cursor::new(&map, &opts).collect();
        assert_eq!(out, vec![(b"b".to_vec(), b"2".to_vec())]);
    }

    #[test]
    fn prefix_filters_by_byte_prefix() {
        let mut map = OrderedMap::new(default_comparator());
        for i in 0..100 {
            let key = format!("user_{i:03}");
            map.insert(key.clone().into_bytes(), key.into_bytes());
        }
        let opts = IterOptions::new().with_prefix(b"user_05".to_vec());
        let out: Vec<_> = Cursor::new(&map, &opts).collect();
        assert_eq!(out.len(), 10);
        assert_eq!(out.first().unwrap().0, b"user_050".to_vec());
        assert_eq!(out.last().unwrap().0, b"user_059".to_vec());
    }

    #[test]
    fn skip_applies_before_limit() {
        let map = sample();
        let opts = IterOptions::new().skipped(1).limited(1);
        let out: Vec<_> = Cursor::new(&map, &opts).collect();
        assert_eq!(out, vec![(b"b".to_vec(), b"2".to_vec())]);
    }
}
