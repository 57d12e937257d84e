//! A deque view over integer-keyed maps.
//!
//! A [`RankMap`] whose keys implement [`DequeKey`] doubles as a
//! double-ended queue: pushing to the front inserts under a key one below
//! the current smallest, pushing to the back one above the current
//! largest.  The first push into an empty map uses [`DequeKey::ORIGIN`].
//! Keys are bookkeeping only; callers interact with values.
//!
//! The view assumes the map's comparator agrees with the numeric order of
//! `K`, which is the case for the default [`NaturalOrder`](crate::NaturalOrder).
//! Mixing these operations with direct [`insert`](RankMap::insert) calls on
//! the same map can break the front-to-back contiguity of the synthesized
//! keys; the map stays a valid ordered map either way.

use crate::arena::{AllocError, Arena};
use crate::order::Comparator;

use super::RankMap;

/// A key type that can mint neighbors just outside an occupied range.
///
/// Implemented for the primitive integers with `ORIGIN` of zero and
/// wrapping predecessor and successor.
pub trait DequeKey: Copy {
    /// The key given to the first element pushed into an empty map.
    const ORIGIN: Self;

    /// The key immediately below `self`.
    fn pred(self) -> Self;

    /// The key immediately above `self`.
    fn succ(self) -> Self;
}

macro_rules! int_deque_key {
    ($($t:ty)*) => {$(
        impl DequeKey for $t {
            const ORIGIN: Self = 0;

            fn pred(self) -> Self {
                self.wrapping_sub(1)
            }

            fn succ(self) -> Self {
                self.wrapping_add(1)
            }
        }
    )*};
}

int_deque_key!(i8 i16 i32 i64 i128 isize u8 u16 u32 u64 u128 usize);

impl<K, V, C, A> RankMap<K, V, C, A>
where
    K: DequeKey,
    C: Comparator<K>,
    A: Arena<K, V>,
{
    /// Pushes `value` below the current smallest key.
    ///
    /// Fails with [`AllocError`] when the arena is exhausted, leaving the
    /// map unchanged.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let mut q: RankMap<i32, &str> = RankMap::new();
    /// q.push_back("b").unwrap();
    /// q.push_back("c").unwrap();
    /// q.push_front("a").unwrap();
    /// assert_eq!(q.values_to_vec(), vec!["a", "b", "c"]);
    /// ```
    pub fn push_front(&mut self, value: V) -> Result<(), AllocError> {
        let key = match self.first_key_value() {
            Some((k, _)) => k.pred(),
            None => K::ORIGIN,
        };
        self.insert(key, value)?;
        Ok(())
    }

    /// Pushes `value` above the current largest key.
    pub fn push_back(&mut self, value: V) -> Result<(), AllocError> {
        let key = match self.last_key_value() {
            Some((k, _)) => k.succ(),
            None => K::ORIGIN,
        };
        self.insert(key, value)?;
        Ok(())
    }

    /// Removes and returns the value under the smallest key.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let mut q: RankMap<i32, u8> = RankMap::new();
    /// q.push_back(1).unwrap();
    /// q.push_back(2).unwrap();
    /// assert_eq!(q.pop_front(), Some(1));
    /// assert_eq!(q.pop_front(), Some(2));
    /// assert_eq!(q.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<V> {
        let key = *self.first_key_value()?.0;
        self.remove(&key)
    }

    /// Removes and returns the value under the largest key.
    pub fn pop_back(&mut self) -> Option<V> {
        let key = *self.last_key_value()?.0;
        self.remove(&key)
    }

    /// Borrows the value under the smallest key.
    pub fn front(&self) -> Option<&V> {
        self.first_key_value().map(|e| e.1)
    }

    /// Borrows the value under the largest key.
    pub fn back(&self) -> Option<&V> {
        self.last_key_value().map(|e| e.1)
    }

    // Stack aliases: LIFO on the back end.

    /// Pushes `value` onto the back, stack style.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let mut s: RankMap<i32, u8> = RankMap::new();
    /// s.push(1).unwrap();
    /// s.push(2).unwrap();
    /// assert_eq!(s.peek(), Some(&2));
    /// assert_eq!(s.pop(), Some(2));
    /// assert_eq!(s.pop(), Some(1));
    /// ```
    pub fn push(&mut self, value: V) -> Result<(), AllocError> {
        self.push_back(value)
    }

    /// Removes and returns the value most recently [`push`](Self::push)ed.
    pub fn pop(&mut self) -> Option<V> {
        self.pop_back()
    }

    /// Borrows the value at the top of the stack.
    pub fn peek(&self) -> Option<&V> {
        self.back()
    }
}
