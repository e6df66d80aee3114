//! Pluggable key ordering.
//!
//! The comparator is the single source of truth for "what order are keys
//! in". It is chosen once, at database-creation time, and must stay fixed
//! for the lifetime of a store instance: the [`crate::OrderedKey`] wrapper
//! that backs the sorted map captures a shared handle to it and never
//! re-derives order from raw bytes.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A total order over opaque byte keys.
///
/// Implementations must be stateless and satisfy antisymmetry, transitivity,
/// and totality. Violating these is a programming error with undefined
/// store behavior (see [`crate::Error::InvariantViolation`] for the
/// best-effort detection this crate performs).
pub trait Comparator: Send + Sync + fmt::Debug {
    /// Compare `a` against `b`, returning the familiar `Ordering` trichotomy.
    fn cmp(&self, a: &[u8], b: &[u8]) -> Ordering;

    /// A short, stable name identifying this ordering. Used only for
    /// diagnostics; two comparators with the same name are not guaranteed
    /// to agree, callers must still use the *same instance* consistently.
    fn name(&self) -> &str;

    /// True for the built-in byte-lexicographic comparator. The iterator
    /// factory uses this to decide whether a prefix scan can be served by a
    /// cheap range seek or must fall back to a full filtered scan (see
    /// `ordkv_storage::cursor`).
    fn is_lexicographic(&self) -> bool {
        false
    }
}

/// Lexicographic ordering over unsigned bytes. The default comparator.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicographicComparator;

impl Comparator for LexicographicComparator {
    fn cmp(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }

    fn name(&self) -> &str {
        "lexicographic"
    }

    fn is_lexicographic(&self) -> bool {
        true
    }
}

/// The reverse of byte-lexicographic ordering.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReverseComparator;

impl Comparator for ReverseComparator {
    fn cmp(&self, a: &[u8], b: &[u8]) -> Ordering {
        b.cmp(a)
    }

    fn name(&self) -> &str {
        "reverse-lexicographic"
    }
}

/// Orders keys as decimal ASCII integers, falling back to byte comparison
/// when a key is not parseable as one (so totality still holds over
/// arbitrary byte strings). Demonstrates that comparators need not agree
/// with byte order: `"2" < "10"` under this comparator, unlike under
/// [`LexicographicComparator`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NumericStringComparator;

impl NumericStringComparator {
    fn parse(key: &[u8]) -> Option<u128> {
        std::str::from_utf8(key).ok()?.parse().ok()
    }
}

impl Comparator for NumericStringComparator {
    fn cmp(&self, a: &[u8], b: &[u8]) -> Ordering {
        match (Self::parse(a), Self::parse(b)) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
            _ => a.cmp(b),
        }
    }

    fn name(&self) -> &str {
        "numeric-string"
    }
}

/// Shared handle to a comparator, cheap to clone and safe to stash inside
/// every key wrapper in the sorted map.
pub type SharedComparator = Arc<dyn Comparator>;

/// Wraps [`LexicographicComparator`] in a [`SharedComparator`].
pub fn default_comparator() -> SharedComparator {
    Arc::new(LexicographicComparator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_orders_by_bytes() {
        let c = LexicographicComparator;
        assert_eq!(c.cmp(b"a", b"b"), Ordering::Less);
        assert_eq!(c.cmp(b"10", b"2"), Ordering::Less);
    }

    #[test]
    fn reverse_inverts_lexicographic() {
        let c = ReverseComparator;
        assert_eq!(c.cmp(b"a", b"b"), Ordering::Greater);
    }

    #[test]
    fn numeric_string_orders_by_value() {
        let c = NumericStringComparator;
        assert_eq!(c.cmp(b"2", b"10"), Ordering::Less);
        assert_eq!(c.cmp(b"10", b"10"), Ordering::Equal);
    }

    #[test]
    fn numeric_string_falls_back_for_non_numeric() {
        let c = NumericStringComparator;
        assert_eq!(c.cmp(b"abc", b"abd"), Ordering::Less);
    }
}
