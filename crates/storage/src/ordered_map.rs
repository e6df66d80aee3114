//! The sorted in-memory key→value structure, ordered under a pluggable
//! comparator.
//!
//! `std::collections::BTreeMap` needs a compile-time `Ord` impl, but the
//! comparator here is chosen at runtime. [`OrderedKey`] bridges the two: it
//! pairs each key's raw bytes with a shared handle to the comparator and
//! implements `Ord` by delegating to it. The `Arc` clone per comparison is
//! a pointer bump, not a real cost, so point lookup/insert/delete and
//! cursor seeks stay logarithmic in entry count, as required.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use ordkv_core::{Comparator, Key, SharedComparator, Value};

/// A key paired with the comparator that orders it. `Ord`/`Eq` delegate to
/// the comparator, so a `BTreeMap<OrderedKey, Value>` is sorted exactly as
/// the store's configured comparator demands.
#[derive(Clone)]
pub struct OrderedKey {
    bytes: Key,
    comparator: SharedComparator,
}

impl OrderedKey {
    fn new(bytes: Key, comparator: SharedComparator) -> Self {
        Self { bytes, comparator }
    }

    /// The raw key bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl PartialEq for OrderedKey {
    fn eq(&self, other: &Self) -> bool {
        self.comparator.cmp(&self.bytes, &other.bytes) == Ordering::Equal
    }
}

impl Eq for OrderedKey {}

impl PartialOrd for OrderedKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparator.cmp(&self.bytes, &other.bytes)
    }
}

/// The sorted map of live entries. Owned exclusively by the storage engine;
/// snapshots hold their own deep clone (see `ordkv_concurrency::snapshot`).
#[derive(Clone)]
pub struct OrderedMap {
    comparator: SharedComparator,
    entries: BTreeMap<OrderedKey, Value>,
}

impl OrderedMap {
    /// An empty map ordered by `comparator`.
    pub fn new(comparator: SharedComparator) -> Self {
        Self {
            comparator,
            entries: BTreeMap::new(),
        }
    }

    /// The comparator this map is ordered under.
    pub fn comparator(&self) -> &SharedComparator {
        &self.comparator
    }

    fn wrap(&self, key: Key) -> OrderedKey {
        OrderedKey::new(key, self.comparator.clone())
    }

    /// Insert or overwrite `key` with `value`. Returns the previous value,
    /// if any, so callers (e.g. the storage engine's `put`) can decide
    /// whether this was a fresh insert.
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        self.entries.insert(self.wrap(key), value)
    }

    /// Remove `key`. Returns `true` iff it was present.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        self.entries.remove(&self.wrap(key.to_vec())).is_some()
    }

    /// The current value for `key`, if present.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.entries.get(&self.wrap(key.to_vec()))
    }

    /// True iff `key` is present.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Count of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True iff the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in strictly increasing comparator order. Used by the
    /// persistence codec to serialize the store at flush time (§4.4: entries
    /// are written in forward comparator order).
    pub fn iter_forward(&self) -> impl Iterator<Item = (&[u8], &Value)> {
        self.entries.iter().map(|(k, v)| (k.bytes(), v))
    }

    /// Resolve a `(Bound<Key>, Bound<Key>)` pair (as produced by
    /// `IterOptions::resolve_bounds`) into the matching wrapped bounds for a
    /// `BTreeMap::range` call.
    fn wrap_bounds(&self, lower: Bound<Key>, upper: Bound<Key>) -> (Bound<OrderedKey>, Bound<OrderedKey>) {
        let wrap_bound = |b: Bound<Key>| match b {
            Bound::Included(k) => Bound::Included(self.wrap(k)),
            Bound::Excluded(k) => Bound::Excluded(self.wrap(k)),
            Bound::Unbounded => Bound::Unbounded,
        };
        (wrap_bound(lower), wrap_bound(upper))
    }

    /// A forward-order iterator over `[lower, upper)`, as bytes.
    pub fn range_forward<'a>(
        &'a self,
        lower: Bound<Key>,
        upper: Bound<Key>,
    ) -> impl DoubleEndedIterator<Item = (&'a [u8], &'a Value)> {
        let (lo, hi) = self.wrap_bounds(lower, upper);
        self.entries.range((lo, hi)).map(|(k, v)| (k.bytes(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordkv_core::{default_comparator, ReverseComparator};
    use std::sync::Arc;

    #[test]
    fn insert_get_remove_roundtrip() {
        let mut map = OrderedMap::new(default_comparator());
        assert_eq!(map.insert(b"a".to_vec(), b"1".to_vec()), None);
        assert_eq!(map.get(b"a"), Some(&b"1".to_vec()));
        assert_eq!(map.insert(b"a".to_vec(), b"2".to_vec()), Some(b"1".to_vec()));
        assert!(map.remove(b"a"));
        assert!(!map.remove(b"a"));
        assert_eq!(map.get(b"a"), None);
    }

    #[test]
    fn forward_iteration_is_comparator_ordered() {
        let mut map = OrderedMap::new(default_comparator());
        map.insert(b"c".to_vec(), b"3".to_vec());
        map.insert(b"a".to_vec(), b"1".to_vec());
        map.insert(b"b".to_vec(), b"2".to_vec());

        let keys: Vec<_> = map.iter_forward().map(|(k, _)| k.to_vec()).collect();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn reverse_comparator_changes_order() {
        let mut map = OrderedMap::new(Arc::new(ReverseComparator));
        for k in ["a", "b", "c"] {
            map.insert(k.as_bytes().to_vec(), vec![]);
        }
        let keys: Vec<_> = map.iter_forward().map(|(k, _)| k.to_vec()).collect();
        assert_eq!(keys, vec![b"c".to_vec(), b"b".to_vec(), b"a".to_vec()]);
    }

    #[test]
    fn len_tracks_distinct_live_keys() {
        let mut map = OrderedMap::new(default_comparator());
        map.insert(b"a".to_vec(), vec![]);
        map.insert(b"a".to_vec(), vec![1]);
        map.insert(b"b".to_vec(), vec![]);
        assert_eq!(map.len(), 2);
    }

    proptest::proptest! {
        // Invariant 1 (ordering): forward iteration is always strictly
        // increasing under the comparator, for any sequence of inserts.
        #[test]
        fn forward_iteration_is_always_strictly_increasing(
            keys in proptest::collection::vec(proptest::collection::vec(0u8..4, 0..6), 0..50)
        ) {
            let mut map = OrderedMap::new(default_comparator());
            for k in &keys {
                map.insert(k.clone(), vec![]);
            }
            let seen: Vec<_> = map.iter_forward().map(|(k, _)| k.to_vec()).collect();
            for pair in seen.windows(2) {
                proptest::prop_assert!(pair[0] < pair[1]);
            }
        }

        // Invariant 2 (uniqueness): len() always equals the number of
        // distinct keys inserted, regardless of duplicates or deletes.
        #[test]
        fn len_equals_distinct_live_key_count(
            ops in proptest::collection::vec(
                (proptest::collection::vec(0u8..4, 0..6), proptest::bool::ANY),
                0..80,
            )
        ) {
            use std::collections::BTreeSet;
            let mut map = OrderedMap::new(default_comparator());
            let mut model: BTreeSet<Vec<u8>> = BTreeSet::new();
            for (key, is_delete) in ops {
                if is_delete {
                    map.remove(&key);
                    model.remove(&key);
                } else {
                    map.insert(key.clone(), vec![]);
                    model.insert(key);
                }
            }
            proptest::prop_assert_eq!(map.len(), model.len());
        }
    }
}
