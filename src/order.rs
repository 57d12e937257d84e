//! Pluggable total orders over map keys.

use std::cmp::Ordering;

/// A total order over `K`, fixed for the lifetime of the map using it.
///
/// Swapping the comparator out from under a populated map would scramble
/// the search invariant, so a map takes its comparator at construction and
/// never exposes it mutably.
pub trait Comparator<K> {
    /// Compares two keys.
    fn cmp(&self, a: &K, b: &K) -> Ordering;
}

/// The natural order of `K: Ord`.  This is the default comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord> Comparator<K> for NaturalOrder {
    fn cmp(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// The natural order of `K: Ord`, reversed.
///
/// # Examples
/// ```
/// use rank_collections::{RankMap, ReverseOrder};
///
/// let mut m = RankMap::with_comparator(ReverseOrder);
/// m.insert(1, "one").unwrap();
/// m.insert(3, "three").unwrap();
/// m.insert(2, "two").unwrap();
/// assert_eq!(m.first_key_value(), Some((&3, &"three")));
/// assert_eq!(m.nth(2), Some((&1, &"one")));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReverseOrder;

impl<K: Ord> Comparator<K> for ReverseOrder {
    fn cmp(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

/// Any ordering closure is a comparator.
///
/// # Examples
/// ```
/// use rank_collections::RankMap;
///
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
/// let mut m = RankMap::with_comparator(by_len);
/// m.insert("pear", 1).unwrap();
/// m.insert("fig", 2).unwrap();
/// assert_eq!(m.first_key_value(), Some((&"fig", &2)));
/// ```
impl<K, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    fn cmp(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
