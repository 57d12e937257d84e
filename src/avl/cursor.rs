//! Circular, bidirectional cursors over a [`RankMap`].
//!
//! A cursor remembers a position inside the map and steps to the
//! neighboring entry in either direction.  Stepping past the last entry
//! wraps around to the first and vice versa, so a cursor never runs off the
//! end of a non-empty map.  Because the position is a key lookup rather
//! than a pointer into the tree, stepping costs O(log n).
//!
//! [`Cursor`] borrows the map immutably; [`CursorMut`] borrows it mutably
//! and can modify the value under the cursor, but not the set of keys.
//! Structural edits while a cursor is live are ruled out by the borrow.

use crate::arena::{Arena, DynamicArena, NodeRef};
use crate::order::{Comparator, NaturalOrder};

use super::RankMap;

/// A read-only cursor over a [`RankMap`], created by
/// [`cursor`](RankMap::cursor) or [`cursor_at`](RankMap::cursor_at).
///
/// A fresh cursor from [`cursor`](RankMap::cursor) points nowhere; the
/// first [`move_next`](Self::move_next) lands on the smallest entry and the
/// first [`move_prev`](Self::move_prev) on the largest.
///
/// # Examples
/// ```
/// use rank_collections::RankMap;
///
/// let m = RankMap::try_from_iter([(1, "a"), (2, "b"), (3, "c")]).unwrap();
/// let mut cur = m.cursor();
///
/// assert_eq!(cur.move_next(), Some((&1, &"a")));
/// assert_eq!(cur.move_next(), Some((&2, &"b")));
/// assert_eq!(cur.move_next(), Some((&3, &"c")));
/// // off the end, the cursor wraps back to the start
/// assert_eq!(cur.move_next(), Some((&1, &"a")));
/// ```
pub struct Cursor<'a, K, V, C = NaturalOrder, A = DynamicArena<K, V>> {
    map: &'a RankMap<K, V, C, A>,
    at: Option<NodeRef>,
}

impl<'a, K, V, C, A> Cursor<'a, K, V, C, A>
where
    C: Comparator<K>,
    A: Arena<K, V>,
{
    /// The key under the cursor, if it points at an entry.
    pub fn key(&self) -> Option<&'a K> {
        self.entry().map(|e| e.0)
    }

    /// The value under the cursor, if it points at an entry.
    pub fn value(&self) -> Option<&'a V> {
        self.entry().map(|e| e.1)
    }

    /// The entry under the cursor, if it points at one.
    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        let map = self.map;
        self.at.map(|at| map.entry_at(at))
    }

    /// Returns true when an entry with a larger key exists, or when the
    /// cursor points nowhere and the map is non-empty.
    ///
    /// This ignores the circular wrap: at the largest entry it returns
    /// false even though [`move_next`](Self::move_next) would still land
    /// somewhere.
    pub fn has_next(&self) -> bool {
        match self.at {
            None => !self.map.is_empty(),
            Some(at) => self.map.higher_ref(&self.map.node(at).key).is_some(),
        }
    }

    /// Returns true when an entry with a smaller key exists, or when the
    /// cursor points nowhere and the map is non-empty.
    pub fn has_prev(&self) -> bool {
        match self.at {
            None => !self.map.is_empty(),
            Some(at) => self.map.lower_ref(&self.map.node(at).key).is_some(),
        }
    }

    /// Steps to the next entry in key order, wrapping to the smallest after
    /// the largest, and returns it.  On an empty map the cursor stays put
    /// and returns `None`.
    pub fn move_next(&mut self) -> Option<(&'a K, &'a V)> {
        let map = self.map;
        self.at = match self.at {
            None => map.first_ref(),
            Some(at) => map
                .higher_ref(&map.node(at).key)
                .or_else(|| map.first_ref()),
        };
        self.entry()
    }

    /// Steps to the previous entry in key order, wrapping to the largest
    /// before the smallest, and returns it.
    pub fn move_prev(&mut self) -> Option<(&'a K, &'a V)> {
        let map = self.map;
        self.at = match self.at {
            None => map.last_ref(),
            Some(at) => map.lower_ref(&map.node(at).key).or_else(|| map.last_ref()),
        };
        self.entry()
    }
}

/// A cursor over a [`RankMap`] that can modify values, created by
/// [`cursor_mut`](RankMap::cursor_mut).
///
/// Keys stay fixed; only the value under the cursor can change.  That
/// keeps the cursor's notion of position valid for as long as it lives.
///
/// # Examples
/// ```
/// use rank_collections::RankMap;
///
/// let mut m = RankMap::try_from_iter([(1, 10), (2, 20)]).unwrap();
/// let mut cur = m.cursor_mut();
/// // the wrap is circular, so stop at the largest key instead of
/// // waiting for the end
/// while cur.has_next() {
///     cur.move_next();
///     *cur.value_mut().unwrap() += 1;
/// }
/// assert_eq!(m.values_to_vec(), vec![11, 21]);
/// ```
pub struct CursorMut<'a, K, V, C = NaturalOrder, A = DynamicArena<K, V>> {
    map: &'a mut RankMap<K, V, C, A>,
    at: Option<NodeRef>,
}

impl<K, V, C, A> CursorMut<'_, K, V, C, A>
where
    C: Comparator<K>,
    A: Arena<K, V>,
{
    /// The key under the cursor, if it points at an entry.
    pub fn key(&self) -> Option<&K> {
        self.at.map(|at| &self.map.node(at).key)
    }

    /// The value under the cursor, if it points at an entry.
    pub fn value(&self) -> Option<&V> {
        self.at.map(|at| &self.map.node(at).val)
    }

    /// A mutable reference to the value under the cursor.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        let at = self.at?;
        Some(&mut self.map.node_mut(at).val)
    }

    /// Replaces the value under the cursor, returning the old one.  Does
    /// nothing and returns `None` when the cursor points nowhere.
    pub fn set_value(&mut self, value: V) -> Option<V> {
        let slot = self.value_mut()?;
        Some(std::mem::replace(slot, value))
    }

    /// Returns true when an entry with a larger key exists, or when the
    /// cursor points nowhere and the map is non-empty.
    pub fn has_next(&self) -> bool {
        match self.at {
            None => !self.map.is_empty(),
            Some(at) => self.map.higher_ref(&self.map.node(at).key).is_some(),
        }
    }

    /// Returns true when an entry with a smaller key exists, or when the
    /// cursor points nowhere and the map is non-empty.
    pub fn has_prev(&self) -> bool {
        match self.at {
            None => !self.map.is_empty(),
            Some(at) => self.map.lower_ref(&self.map.node(at).key).is_some(),
        }
    }

    /// Steps to the next entry in key order, wrapping to the smallest after
    /// the largest, and returns it.
    pub fn move_next(&mut self) -> Option<(&K, &V)> {
        let map = &*self.map;
        self.at = match self.at {
            None => map.first_ref(),
            Some(at) => map
                .higher_ref(&map.node(at).key)
                .or_else(|| map.first_ref()),
        };
        let at = self.at?;
        Some(self.map.entry_at(at))
    }

    /// Steps to the previous entry in key order, wrapping to the largest
    /// before the smallest, and returns it.
    pub fn move_prev(&mut self) -> Option<(&K, &V)> {
        let map = &*self.map;
        self.at = match self.at {
            None => map.last_ref(),
            Some(at) => map.lower_ref(&map.node(at).key).or_else(|| map.last_ref()),
        };
        let at = self.at?;
        Some(self.map.entry_at(at))
    }
}

impl<K, V, C, A> RankMap<K, V, C, A>
where
    C: Comparator<K>,
    A: Arena<K, V>,
{
    /// Creates a cursor positioned before any entry.
    pub fn cursor(&self) -> Cursor<'_, K, V, C, A> {
        Cursor { map: self, at: None }
    }

    /// Creates a cursor positioned at `key`, or before any entry if `key`
    /// is absent.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let m = RankMap::try_from_iter([(1, "a"), (2, "b")]).unwrap();
    /// let mut cur = m.cursor_at(&1);
    /// assert_eq!(cur.key(), Some(&1));
    /// assert_eq!(cur.move_next(), Some((&2, &"b")));
    /// ```
    pub fn cursor_at(&self, key: &K) -> Cursor<'_, K, V, C, A> {
        Cursor {
            at: self.find(key),
            map: self,
        }
    }

    /// Creates a value-mutating cursor positioned before any entry.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V, C, A> {
        CursorMut { map: self, at: None }
    }
}
