use std::cmp::Ordering::*;
use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem::replace;

use crate::arena::{AllocError, Arena, DynamicArena, Node, NodeRef};
use crate::order::{Comparator, NaturalOrder};

pub mod cursor;
pub mod deque;

type OptRef = Option<NodeRef>;

/// An ordered map with O(log n) rank queries.
///
/// `RankMap` keeps its entries in an AVL-balanced search tree whose nodes
/// record the size of the subtree below them, so the i-th smallest entry
/// can be found without walking the tree ([`nth`](Self::nth)).
///
/// The ordering comes from a [`Comparator`] chosen at construction
/// ([`NaturalOrder`] by default) and node storage comes from an [`Arena`]
/// the map owns ([`DynamicArena`] by default).  With a bounded arena,
/// inserting can fail with [`AllocError`]; a failed insert leaves the map
/// exactly as it was.
///
/// # Examples
/// ```
/// use rank_collections::RankMap;
///
/// let mut m = RankMap::new();
/// m.insert(30, "c").unwrap();
/// m.insert(10, "a").unwrap();
/// m.insert(20, "b").unwrap();
///
/// assert_eq!(m.get(&20), Some(&"b"));
/// assert_eq!(m.nth(0), Some((&10, &"a")));
/// assert_eq!(m.nth(2), Some((&30, &"c")));
/// ```
pub struct RankMap<K, V, C = NaturalOrder, A = DynamicArena<K, V>> {
    len: usize,
    root: OptRef,
    cmp: C,
    arena: A,
    // entries live inside the arena, not in any field of ours
    marker: PhantomData<(K, V)>,
}

impl<K, V, C, A> RankMap<K, V, C, A> {
    /// Creates an empty map from an arena and a comparator.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::{RankMap, ReverseOrder, SlabArena};
    ///
    /// let mut m = RankMap::with_parts(SlabArena::new(8), ReverseOrder);
    /// m.insert(1u32, 1).unwrap();
    /// ```
    pub fn with_parts(arena: A, cmp: C) -> Self {
        RankMap {
            len: 0,
            root: None,
            cmp,
            arena,
            marker: PhantomData,
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Borrows the map's arena.
    pub fn arena(&self) -> &A {
        &self.arena
    }
}

// The constructors below live in impls that pin the defaulted parameters,
// so `RankMap::new()` and friends infer without turbofish.

impl<K, V> RankMap<K, V> {
    /// Creates an empty map with the natural order and an unbounded arena.
    pub fn new() -> Self {
        Self::with_parts(DynamicArena::new(), NaturalOrder)
    }
}

impl<K, V, A> RankMap<K, V, NaturalOrder, A> {
    /// Creates an empty map storing its nodes in `arena`.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::{RankMap, SlabArena};
    ///
    /// let mut m = RankMap::new_in(SlabArena::new(2));
    /// m.insert(1, "a").unwrap();
    /// m.insert(2, "b").unwrap();
    /// assert!(m.insert(3, "c").is_err());
    /// ```
    pub fn new_in(arena: A) -> Self {
        Self::with_parts(arena, NaturalOrder)
    }
}

impl<K, V, C> RankMap<K, V, C, DynamicArena<K, V>> {
    /// Creates an empty map ordered by `cmp`, in an unbounded arena.
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_parts(DynamicArena::new(), cmp)
    }
}

impl<K, V, C: Default, A: Default> Default for RankMap<K, V, C, A> {
    fn default() -> Self {
        Self::with_parts(A::default(), C::default())
    }
}

impl<K, V, C, A> RankMap<K, V, C, A>
where
    C: Comparator<K>,
    A: Arena<K, V>,
{
    pub(crate) fn node(&self, at: NodeRef) -> &Node<K, V> {
        self.arena.node(at)
    }

    fn node_mut(&mut self, at: NodeRef) -> &mut Node<K, V> {
        self.arena.node_mut(at)
    }

    // An absent subtree counts as height 0 here, matching the balance
    // arithmetic used throughout: a leaf and an empty slot contribute the
    // same height.
    fn height_of(&self, at: OptRef) -> i8 {
        at.map_or(0, |r| self.node(r).height)
    }

    fn size_of(&self, at: OptRef) -> usize {
        at.map_or(0, |r| self.node(r).size)
    }

    fn balance_of(&self, at: NodeRef) -> i8 {
        let n = self.node(at);
        self.height_of(n.left) - self.height_of(n.right)
    }

    // recomputes height and size of `at` from its children
    fn update(&mut self, at: NodeRef) {
        let (left, right) = {
            let n = self.node(at);
            (n.left, n.right)
        };
        let height = match (left, right) {
            (None, None) => 0,
            (Some(c), None) | (None, Some(c)) => 1 + self.node(c).height,
            (Some(l), Some(r)) => 1 + self.node(l).height.max(self.node(r).height),
        };
        let size = 1 + self.size_of(left) + self.size_of(right);
        let n = self.node_mut(at);
        n.height = height;
        n.size = size;
    }

    // Rotations return the new subtree root.  Bookkeeping is recomputed
    // bottom-up: displaced middle subtree, then the demoted root, then the
    // promoted root, since each depends on the one before it.

    fn rotate_right(&mut self, y: NodeRef) -> NodeRef {
        let Some(x) = self.node(y).left else { return y };
        let z = self.node(x).right;
        self.node_mut(x).right = Some(y);
        self.node_mut(y).left = z;
        if let Some(z) = z {
            self.update(z);
        }
        self.update(y);
        self.update(x);
        x
    }

    fn rotate_left(&mut self, x: NodeRef) -> NodeRef {
        let Some(y) = self.node(x).right else { return x };
        let z = self.node(y).left;
        self.node_mut(y).left = Some(x);
        self.node_mut(x).right = z;
        if let Some(z) = z {
            self.update(z);
        }
        self.update(x);
        self.update(y);
        y
    }

    // Restores the balance invariant at `at` after an insertion somewhere
    // below it.  The inserted key's ordering relative to the taller child
    // identifies which grandchild grew, which picks between the single and
    // the double rotation.
    fn rebalance_grown(&mut self, at: NodeRef, key: &K) -> NodeRef {
        self.update(at);

        let balance = self.balance_of(at);

        if balance > 1 {
            let left = self.node(at).left.expect("left-heavy node without a left child");
            match self.cmp.cmp(key, &self.node(left).key) {
                Less => return self.rotate_right(at),
                Greater => {
                    let new_left = self.rotate_left(left);
                    self.node_mut(at).left = Some(new_left);
                    return self.rotate_right(at);
                }
                Equal => {}
            }
        } else if balance < -1 {
            let right = self.node(at).right.expect("right-heavy node without a right child");
            match self.cmp.cmp(key, &self.node(right).key) {
                Greater => return self.rotate_left(at),
                Less => {
                    let new_right = self.rotate_right(right);
                    self.node_mut(at).right = Some(new_right);
                    return self.rotate_left(at);
                }
                Equal => {}
            }
        }

        at
    }

    // Restores the balance invariant at `at` after a removal somewhere
    // below it.  The removed key may have been on either side, so the
    // rotation is directed by the taller child's own lean, not by a key
    // comparison.
    fn rebalance_shrunk(&mut self, at: NodeRef) -> NodeRef {
        self.update(at);

        let balance = self.balance_of(at);

        if balance > 1 {
            let left = self.node(at).left.expect("left-heavy node without a left child");
            if self.balance_of(left) >= 0 {
                self.rotate_right(at)
            } else {
                let new_left = self.rotate_left(left);
                self.node_mut(at).left = Some(new_left);
                self.rotate_right(at)
            }
        } else if balance < -1 {
            let right = self.node(at).right.expect("right-heavy node without a right child");
            if self.balance_of(right) <= 0 {
                self.rotate_left(at)
            } else {
                let new_right = self.rotate_right(right);
                self.node_mut(at).right = Some(new_right);
                self.rotate_left(at)
            }
        } else {
            at
        }
    }

    pub(crate) fn find(&self, key: &K) -> OptRef {
        let mut cur = self.root;
        while let Some(at) = cur {
            let n = self.node(at);
            cur = match self.cmp.cmp(key, &n.key) {
                Less => n.left,
                Greater => n.right,
                Equal => return Some(at),
            };
        }
        None
    }

    pub(crate) fn first_ref(&self) -> OptRef {
        let mut cur = self.root?;
        while let Some(l) = self.node(cur).left {
            cur = l;
        }
        Some(cur)
    }

    pub(crate) fn last_ref(&self) -> OptRef {
        let mut cur = self.root?;
        while let Some(r) = self.node(cur).right {
            cur = r;
        }
        Some(cur)
    }

    // last-turn successor search: remember the node every time the descent
    // goes left past the query key
    pub(crate) fn higher_ref(&self, key: &K) -> OptRef {
        let mut cur = self.root;
        let mut successor = None;
        while let Some(at) = cur {
            let n = self.node(at);
            if self.cmp.cmp(key, &n.key) == Less {
                successor = Some(at);
                cur = n.left;
            } else {
                cur = n.right;
            }
        }
        successor
    }

    pub(crate) fn lower_ref(&self, key: &K) -> OptRef {
        let mut cur = self.root;
        let mut predecessor = None;
        while let Some(at) = cur {
            let n = self.node(at);
            if self.cmp.cmp(key, &n.key) == Greater {
                predecessor = Some(at);
                cur = n.right;
            } else {
                cur = n.left;
            }
        }
        predecessor
    }

    fn nth_ref(&self, index: usize) -> OptRef {
        let mut cur = self.root;
        let mut prior = 0;
        while let Some(at) = cur {
            let n = self.node(at);
            let left_size = self.size_of(n.left);
            match (prior + left_size).cmp(&index) {
                Equal => return Some(at),
                Greater => cur = n.left,
                Less => {
                    prior += left_size + 1;
                    cur = n.right;
                }
            }
        }
        None
    }

    fn entry_at(&self, at: NodeRef) -> (&K, &V) {
        let n = self.node(at);
        (&n.key, &n.val)
    }

    /// Returns a reference to the value for `key`, if present.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let mut m = RankMap::new();
    /// m.insert(1, "one").unwrap();
    /// assert_eq!(m.get(&1), Some(&"one"));
    /// assert_eq!(m.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|at| &self.node(at).val)
    }

    /// Returns a mutable reference to the value for `key`, if present.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let at = self.find(key)?;
        Some(&mut self.node_mut(at).val)
    }

    /// Returns true when `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first_ref().map(|at| self.entry_at(at))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last_ref().map(|at| self.entry_at(at))
    }

    /// Returns the entry with the smallest key strictly above `key`.
    ///
    /// `key` itself need not be present.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let mut m = RankMap::new();
    /// for k in [10, 20, 30] {
    ///     m.insert(k, ()).unwrap();
    /// }
    /// assert_eq!(m.higher(&15), Some((&20, &())));
    /// assert_eq!(m.higher(&30), None);
    /// ```
    pub fn higher(&self, key: &K) -> Option<(&K, &V)> {
        self.higher_ref(key).map(|at| self.entry_at(at))
    }

    /// Returns the entry with the largest key strictly below `key`.
    pub fn lower(&self, key: &K) -> Option<(&K, &V)> {
        self.lower_ref(key).map(|at| self.entry_at(at))
    }

    /// Returns the entry with the `index`-th smallest key (0-based), in
    /// O(log n) via the subtree-size augmentation.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let mut m = RankMap::new();
    /// for k in [50, 10, 40, 20, 30] {
    ///     m.insert(k, k * 10).unwrap();
    /// }
    /// assert_eq!(m.nth(0), Some((&10, &100)));
    /// assert_eq!(m.nth(3), Some((&40, &400)));
    /// assert_eq!(m.nth(5), None);
    /// ```
    pub fn nth(&self, index: usize) -> Option<(&K, &V)> {
        self.nth_ref(index).map(|at| self.entry_at(at))
    }

    /// Like [`nth`](Self::nth), with a mutable reference to the value.
    pub fn nth_mut(&mut self, index: usize) -> Option<(&K, &mut V)> {
        let at = self.nth_ref(index)?;
        let n = self.node_mut(at);
        Some((&n.key, &mut n.val))
    }

    /// Creates an iterator over the entries, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V, C, A> {
        let mut work = Vec::new();
        let mut cur = self.root;
        while let Some(at) = cur {
            work.push(at);
            cur = self.node(at).left;
        }
        Iter {
            map: self,
            work,
            len: self.len,
        }
    }

    /// Produces an iterator over the keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|p| p.0)
    }

    /// Produces an iterator over the values, ordered by key.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|p| p.1)
    }

    /// Applies `f` to each entry, in key order.
    pub fn for_each<F: FnMut(&K, &V)>(&self, mut f: F) {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    /// Applies `f` to each entry, in key order, with a mutable reference
    /// to each value.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let mut m = RankMap::new();
    /// m.insert(1, 10).unwrap();
    /// m.insert(2, 20).unwrap();
    /// m.for_each_mut(|k, v| *v += k);
    /// assert_eq!(m.get(&2), Some(&22));
    /// ```
    pub fn for_each_mut<F: FnMut(&K, &mut V)>(&mut self, mut f: F) {
        // the arena hands out one &mut at a time, so fix the visit order
        // first and then walk it
        let mut order = Vec::with_capacity(self.len);
        {
            let mut work = Vec::new();
            let mut cur = self.root;
            while let Some(at) = cur {
                work.push(at);
                cur = self.node(at).left;
            }
            while let Some(at) = work.pop() {
                order.push(at);
                let mut cur = self.node(at).right;
                while let Some(c) = cur {
                    work.push(c);
                    cur = self.node(c).left;
                }
            }
        }
        for at in order {
            let n = self.node_mut(at);
            f(&n.key, &mut n.val);
        }
    }

    /// Asserts the structural invariants: search order, stored heights and
    /// sizes, the balance bound, and `len`.  Used by the test suites.
    pub fn chk(&self) {
        let total = self.chk_node(self.root, None, None);
        assert_eq!(total, self.len);
    }

    fn chk_node(&self, at: OptRef, lo: Option<&K>, hi: Option<&K>) -> usize {
        let Some(cur) = at else { return 0 };
        let n = self.node(cur);

        if let Some(lo) = lo {
            assert_eq!(self.cmp.cmp(&n.key, lo), Greater);
        }
        if let Some(hi) = hi {
            assert_eq!(self.cmp.cmp(&n.key, hi), Less);
        }

        let expected_height = match (n.left, n.right) {
            (None, None) => 0,
            (Some(c), None) | (None, Some(c)) => 1 + self.node(c).height,
            (Some(l), Some(r)) => 1 + self.node(l).height.max(self.node(r).height),
        };
        assert_eq!(n.height, expected_height);

        let balance = self.height_of(n.left) - self.height_of(n.right);
        assert!((-1..=1).contains(&balance));

        let left_count = self.chk_node(n.left, lo, Some(&n.key));
        let right_count = self.chk_node(n.right, Some(&n.key), hi);
        assert_eq!(n.size, left_count + right_count + 1);

        left_count + right_count + 1
    }
}

impl<K, V, C, A> RankMap<K, V, C, A>
where
    K: Clone,
    C: Comparator<K>,
    A: Arena<K, V>,
{
    /// Inserts a key-value pair, returning the previous value for the key
    /// if one existed.
    ///
    /// Fails with [`AllocError`] when the arena cannot produce a node; the
    /// map is unchanged in that case.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let mut m = RankMap::new();
    /// assert_eq!(m.insert(1, "a").unwrap(), None);
    /// assert_eq!(m.insert(1, "b").unwrap(), Some("a"));
    /// assert_eq!(m.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, AllocError> {
        let mut value = Some(value);
        let mut replaced = None;
        let new_root = self.insert_node(self.root, &key, &mut value, &mut replaced)?;
        self.root = Some(new_root);
        if replaced.is_none() {
            self.len += 1;
        }
        Ok(replaced)
    }

    // Recursive descent insert.  Allocation happens only at an empty slot,
    // before any link is rewritten, so a failure propagates out with the
    // tree untouched.
    fn insert_node(
        &mut self,
        at: OptRef,
        key: &K,
        value: &mut Option<V>,
        replaced: &mut Option<V>,
    ) -> Result<NodeRef, AllocError> {
        let Some(cur) = at else {
            let v = value.take().expect("insert payload consumed twice");
            return self.arena.allocate(key.clone(), v);
        };

        match self.cmp.cmp(key, &self.node(cur).key) {
            Less => {
                let left = self.node(cur).left;
                let new_left = self.insert_node(left, key, value, replaced)?;
                self.node_mut(cur).left = Some(new_left);
                Ok(self.rebalance_grown(cur, key))
            }

            Greater => {
                let right = self.node(cur).right;
                let new_right = self.insert_node(right, key, value, replaced)?;
                self.node_mut(cur).right = Some(new_right);
                Ok(self.rebalance_grown(cur, key))
            }

            Equal => {
                let v = value.take().expect("insert payload consumed twice");
                *replaced = Some(replace(&mut self.node_mut(cur).val, v));
                Ok(cur)
            }
        }
    }

    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let mut m = RankMap::new();
    /// m.insert(1, "a").unwrap();
    /// assert_eq!(m.remove(&1), Some("a"));
    /// assert_eq!(m.remove(&1), None);
    /// assert!(m.is_empty());
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut deleted = None;
        self.root = self.delete_node(self.root, key, &mut deleted);
        let at = deleted?;
        let (_, v) = self.arena.release(at);
        self.len -= 1;
        Some(v)
    }

    // Recursive descent delete.  At most one node per call ends up in
    // `deleted`; the caller releases it.  Every frame on the unwind
    // rebalances by the surviving children's heights.
    fn delete_node(&mut self, at: OptRef, key: &K, deleted: &mut OptRef) -> OptRef {
        let cur = at?;

        match self.cmp.cmp(key, &self.node(cur).key) {
            Less => {
                let left = self.node(cur).left;
                let new_left = self.delete_node(left, key, deleted);
                self.node_mut(cur).left = new_left;
            }

            Greater => {
                let right = self.node(cur).right;
                let new_right = self.delete_node(right, key, deleted);
                self.node_mut(cur).right = new_right;
            }

            Equal => {
                let (left, right, size) = {
                    let n = self.node(cur);
                    (n.left, n.right, n.size)
                };

                // a leaf: nothing below it, detach
                if size == 1 {
                    *deleted = Some(cur);
                    return None;
                }

                // one child: splice it upward
                if left.is_none() {
                    *deleted = Some(cur);
                    let child = right.expect("node of size > 1 with no children");
                    return Some(self.rebalance_shrunk(child));
                }
                if right.is_none() {
                    *deleted = Some(cur);
                    let child = left.expect("node of size > 1 with no children");
                    return Some(self.rebalance_shrunk(child));
                }

                // Two children: promote the in-order successor.  Unlink it
                // from the right subtree first (it has no left child, so
                // that recursion bottoms out in a detach or splice), then
                // graft it into this node's place.
                *deleted = Some(cur);

                let mut succ = right.expect("checked above");
                while let Some(l) = self.node(succ).left {
                    succ = l;
                }
                let succ_key = self.node(succ).key.clone();

                let mut unlinked = None;
                let new_right = self.delete_node(right, &succ_key, &mut unlinked);
                debug_assert_eq!(unlinked, Some(succ));

                let s = self.node_mut(succ);
                s.left = left;
                s.right = new_right;
                return Some(self.rebalance_shrunk(succ));
            }
        }

        Some(self.rebalance_shrunk(cur))
    }

    /// Removes the entry with the smallest key.
    pub fn remove_first(&mut self) -> Option<(K, V)> {
        let key = self.first_key_value()?.0.clone();
        let val = self.remove(&key)?;
        Some((key, val))
    }

    /// Removes the entry with the largest key.
    pub fn remove_last(&mut self) -> Option<(K, V)> {
        let key = self.last_key_value()?.0.clone();
        let val = self.remove(&key)?;
        Some((key, val))
    }

    /// Removes every entry, returning each node to the arena.
    pub fn clear(&mut self) {
        while self.remove_first().is_some() {}
    }

    /// Keeps only the entries for which `f` returns true.
    ///
    /// Matching entries are collected first and removed afterwards, so a
    /// removal never causes a neighboring entry to be skipped.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let mut m = RankMap::new();
    /// for k in 0..6 {
    ///     m.insert(k, ()).unwrap();
    /// }
    /// m.retain(|k, _| k % 2 == 0);
    /// assert_eq!(m.keys_to_vec(), vec![0, 2, 4]);
    /// ```
    pub fn retain<F: FnMut(&K, &V) -> bool>(&mut self, mut f: F) {
        let mut doomed = Vec::new();
        for (k, v) in self.iter() {
            if !f(k, v) {
                doomed.push(k.clone());
            }
        }
        for k in &doomed {
            self.remove(k);
        }
    }

    /// Inserts every entry of `other` into `self`, overwriting on key
    /// collisions.  On allocation failure the entries inserted so far
    /// remain.
    pub fn put_all<C2, A2>(&mut self, other: &RankMap<K, V, C2, A2>) -> Result<(), AllocError>
    where
        V: Clone,
        C2: Comparator<K>,
        A2: Arena<K, V>,
    {
        for (k, v) in other.iter() {
            self.insert(k.clone(), v.clone())?;
        }
        Ok(())
    }

    /// Removes every key of `other` from `self`.
    pub fn remove_all<C2, A2>(&mut self, other: &RankMap<K, V, C2, A2>)
    where
        C2: Comparator<K>,
        A2: Arena<K, V>,
    {
        for (k, _) in other.iter() {
            self.remove(k);
        }
    }

    /// Keeps only the entries whose key is also present in `other`.
    pub fn retain_all<C2, A2>(&mut self, other: &RankMap<K, V, C2, A2>)
    where
        C2: Comparator<K>,
        A2: Arena<K, V>,
    {
        self.retain(|k, _| other.contains_key(k));
    }

    /// Copies the map into a fresh default arena.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        V: Clone,
        C: Clone,
        A: Default,
    {
        let mut copy = RankMap::with_parts(A::default(), self.cmp.clone());
        copy.put_all(self)?;
        Ok(copy)
    }
}

impl<K: Ord + Clone, V> RankMap<K, V> {
    /// Builds a naturally ordered map from an iterator of pairs.  Later
    /// pairs overwrite earlier ones on key collisions.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let m = RankMap::try_from_iter([(2, "b"), (1, "a")]).unwrap();
    /// assert_eq!(m.keys_to_vec(), vec![1, 2]);
    /// ```
    pub fn try_from_iter<I>(pairs: I) -> Result<Self, AllocError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        for (k, v) in pairs {
            map.insert(k, v)?;
        }
        Ok(map)
    }
}

impl<K, V, C, A> RankMap<K, V, C, A>
where
    C: Comparator<K>,
    A: Arena<K, V>,
{
    /// Returns true when every key of `other` is present in `self`.
    pub fn contains_all<C2, A2>(&self, other: &RankMap<K, V, C2, A2>) -> bool
    where
        C2: Comparator<K>,
        A2: Arena<K, V>,
    {
        if self.len() < other.len() {
            return false;
        }
        other.iter().all(|(k, _)| self.contains_key(k))
    }

    /// Folds every entry, in key order, into an accumulator.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let mut m = RankMap::new();
    /// for (k, v) in [(1, 2.5), (2, 0.5)] {
    ///     m.insert(k, v).unwrap();
    /// }
    /// let total = m.fold(0.0, |acc, _, v| acc + v);
    /// assert_eq!(total, 3.0);
    /// ```
    pub fn fold<B, F: FnMut(B, &K, &V) -> B>(&self, init: B, mut f: F) -> B {
        let mut acc = init;
        for (k, v) in self.iter() {
            acc = f(acc, k, v);
        }
        acc
    }

    /// Sums `f` over every entry, in key order.
    pub fn sum_by<T, F>(&self, mut f: F) -> T
    where
        T: std::iter::Sum<T>,
        F: FnMut(&K, &V) -> T,
    {
        self.iter().map(|(k, v)| f(k, v)).sum()
    }

    /// Counts the entries satisfying `pred`.  Always walks the whole map.
    pub fn count_matching<F: FnMut(&K, &V) -> bool>(&self, mut pred: F) -> usize {
        let mut count = 0;
        for (k, v) in self.iter() {
            if pred(k, v) {
                count += 1;
            }
        }
        count
    }

    /// Returns true when at least one entry satisfies `pred`.
    pub fn any_match<F: FnMut(&K, &V) -> bool>(&self, pred: F) -> bool {
        self.count_matching(pred) > 0
    }

    /// Returns true when every entry satisfies `pred`.  Vacuously true on
    /// an empty map.
    pub fn all_match<F: FnMut(&K, &V) -> bool>(&self, pred: F) -> bool {
        self.count_matching(pred) == self.len
    }

    /// Returns true when no entry satisfies `pred`.
    pub fn none_match<F: FnMut(&K, &V) -> bool>(&self, pred: F) -> bool {
        self.count_matching(pred) == 0
    }

    /// Positional equality: true when both maps have the same size and the
    /// entries at every in-order rank satisfy `pred` pairwise.
    ///
    /// Note this compares by rank, not by key: two maps with disjoint keys
    /// can compare equal under a value-only predicate.
    ///
    /// # Examples
    /// ```
    /// use rank_collections::RankMap;
    ///
    /// let a = RankMap::try_from_iter([(1, "a"), (2, "b")]).unwrap();
    /// let b = RankMap::try_from_iter([(5, "a"), (9, "b")]).unwrap();
    /// assert!(a.eq_by(&b, |x, y| x.1 == y.1));
    /// ```
    pub fn eq_by<C2, A2, F>(&self, other: &RankMap<K, V, C2, A2>, mut pred: F) -> bool
    where
        C2: Comparator<K>,
        A2: Arena<K, V>,
        F: FnMut((&K, &V), (&K, &V)) -> bool,
    {
        self.len == other.len && self.iter().zip(other.iter()).all(|(x, y)| pred(x, y))
    }

    /// Exports the keys into a sorted vector.
    pub fn keys_to_vec(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.keys().cloned().collect()
    }

    /// Exports the values into a vector, ordered by key.
    pub fn values_to_vec(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.values().cloned().collect()
    }
}

impl<K, V, C, A> Debug for RankMap<K, V, C, A>
where
    K: Debug,
    V: Debug,
    C: Comparator<K>,
    A: Arena<K, V>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, A, C2, A2> PartialEq<RankMap<K, V, C2, A2>> for RankMap<K, V, C, A>
where
    K: PartialEq,
    V: PartialEq,
    C: Comparator<K>,
    A: Arena<K, V>,
    C2: Comparator<K>,
    A2: Arena<K, V>,
{
    fn eq(&self, other: &RankMap<K, V, C2, A2>) -> bool {
        self.len == other.len && self.iter().zip(other.iter()).all(|(x, y)| x == y)
    }
}

/// In-order iterator over a [`RankMap`], created by
/// [`iter`](RankMap::iter).
///
/// Tracks its progress with an explicit stack of node refs; nodes have no
/// parent links.
pub struct Iter<'a, K, V, C = NaturalOrder, A = DynamicArena<K, V>> {
    map: &'a RankMap<K, V, C, A>,
    work: Vec<NodeRef>,
    len: usize,
}

impl<'a, K, V, C, A> Iterator for Iter<'a, K, V, C, A>
where
    C: Comparator<K>,
    A: Arena<K, V>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let at = self.work.pop()?;
        self.len -= 1;
        let map = self.map;
        let n = map.node(at);
        let mut cur = n.right;
        while let Some(c) = cur {
            self.work.push(c);
            cur = map.node(c).left;
        }
        Some((&n.key, &n.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V, C, A> ExactSizeIterator for Iter<'a, K, V, C, A>
where
    C: Comparator<K>,
    A: Arena<K, V>,
{
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, K, V, C, A> FusedIterator for Iter<'a, K, V, C, A>
where
    C: Comparator<K>,
    A: Arena<K, V>,
{
}
