//! Node storage strategies.
//!
//! A [`RankMap`](crate::RankMap) never allocates nodes itself; it asks its
//! arena.  Child links are slot indices ([`NodeRef`]) rather than pointers,
//! so an arena is free to keep every node in one growable (or fixed) block
//! and to recycle released slots through a free list.  Releasing a slot
//! always moves the entry out, so stale keys and values never survive into
//! a reused node.

use thiserror::Error;

/// The arena could not produce a node.
///
/// For [`SlabArena`] this means the fixed block is exhausted; for
/// [`PooledArena`] that the pool is at capacity with nothing on the free
/// list.  [`DynamicArena`] never returns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("node arena exhausted")]
pub struct AllocError;

/// An index identifying a node slot within an arena.
///
/// A `NodeRef` is only meaningful to the arena that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRef(u32);

impl NodeRef {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A tree node: an entry plus the AVL bookkeeping for the subtree below it.
pub struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) val: V,
    // longest path to a descendant leaf; a leaf has height 0
    pub(crate) height: i8,
    // nodes in the subtree rooted here, including this one
    pub(crate) size: usize,
    pub(crate) left: Option<NodeRef>,
    pub(crate) right: Option<NodeRef>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, val: V) -> Self {
        Node {
            key,
            val,
            height: 0,
            size: 1,
            left: None,
            right: None,
        }
    }

    /// The node's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The node's value.
    pub fn value(&self) -> &V {
        &self.val
    }

    /// Mutable access to the node's value.  The key is immutable; changing
    /// it would break the search invariant.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.val
    }
}

/// A node-lifecycle provider for one map.
///
/// `allocate` hands out a fresh node (height 0, size 1, no children) or
/// reports exhaustion; `release` takes a slot back and yields the entry
/// that lived there.  A slot is never simultaneously live and on the free
/// list, and `release` must only be passed refs previously returned by
/// `allocate` on the same arena.
pub trait Arena<K, V> {
    /// Allocates a node holding `key` and `value`.
    fn allocate(&mut self, key: K, value: V) -> Result<NodeRef, AllocError>;

    /// Returns a slot to the free list, yielding the entry it held.
    fn release(&mut self, at: NodeRef) -> (K, V);

    /// Borrows the node in slot `at`.
    fn node(&self, at: NodeRef) -> &Node<K, V>;

    /// Mutably borrows the node in slot `at`.
    fn node_mut(&mut self, at: NodeRef) -> &mut Node<K, V>;

    /// Number of nodes currently handed out and not yet released.
    fn live(&self) -> usize;
}

enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next: Option<NodeRef> },
}

// Slot bookkeeping shared by the three arena flavors.  Growth policy stays
// with the arena types themselves.
struct Store<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Option<NodeRef>,
    live: usize,
}

impl<K, V> Store<K, V> {
    fn new() -> Self {
        Store {
            slots: Vec::new(),
            free: None,
            live: 0,
        }
    }

    fn with_vacant(count: usize) -> Self {
        let mut store = Store {
            slots: Vec::with_capacity(count),
            free: None,
            live: 0,
        };
        for _ in 0..count {
            store.push_vacant();
        }
        store
    }

    // carves a new vacant slot and chains it onto the free list
    fn push_vacant(&mut self) {
        let at = NodeRef(self.slots.len() as u32);
        self.slots.push(Slot::Vacant { next: self.free });
        self.free = Some(at);
    }

    // takes the head of the free list, if any
    fn take_free(&mut self) -> Option<NodeRef> {
        let at = self.free?;
        let Slot::Vacant { next } = &self.slots[at.index()] else {
            unreachable!("free list points at an occupied slot");
        };
        self.free = *next;
        Some(at)
    }

    fn occupy(&mut self, at: NodeRef, key: K, value: V) {
        self.slots[at.index()] = Slot::Occupied(Node::new(key, value));
        self.live += 1;
    }

    // appends a brand-new occupied slot
    fn push_occupied(&mut self, key: K, value: V) -> NodeRef {
        let at = NodeRef(self.slots.len() as u32);
        self.slots.push(Slot::Occupied(Node::new(key, value)));
        self.live += 1;
        at
    }

    fn release(&mut self, at: NodeRef) -> (K, V) {
        let slot = std::mem::replace(&mut self.slots[at.index()], Slot::Vacant { next: self.free });
        let Slot::Occupied(node) = slot else {
            panic!("release of a vacant slot");
        };
        self.free = Some(at);
        self.live -= 1;
        (node.key, node.val)
    }

    fn node(&self, at: NodeRef) -> &Node<K, V> {
        match &self.slots[at.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("access to a vacant slot"),
        }
    }

    fn node_mut(&mut self, at: NodeRef) -> &mut Node<K, V> {
        match &mut self.slots[at.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("access to a vacant slot"),
        }
    }
}

/// An unbounded arena: grows on demand and recycles released slots.
///
/// This is the default storage for [`RankMap`](crate::RankMap).
pub struct DynamicArena<K, V> {
    store: Store<K, V>,
}

impl<K, V> DynamicArena<K, V> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        DynamicArena { store: Store::new() }
    }
}

impl<K, V> Default for DynamicArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Arena<K, V> for DynamicArena<K, V> {
    fn allocate(&mut self, key: K, value: V) -> Result<NodeRef, AllocError> {
        Ok(match self.store.take_free() {
            Some(at) => {
                self.store.occupy(at, key, value);
                at
            }
            None => self.store.push_occupied(key, value),
        })
    }

    fn release(&mut self, at: NodeRef) -> (K, V) {
        self.store.release(at)
    }

    fn node(&self, at: NodeRef) -> &Node<K, V> {
        self.store.node(at)
    }

    fn node_mut(&mut self, at: NodeRef) -> &mut Node<K, V> {
        self.store.node_mut(at)
    }

    fn live(&self) -> usize {
        self.store.live
    }
}

/// A free-list arena that pre-carves `preallocated` slots, grows lazily up
/// to `capacity`, and recycles indefinitely after that.
pub struct PooledArena<K, V> {
    store: Store<K, V>,
    capacity: usize,
}

impl<K, V> PooledArena<K, V> {
    /// Creates a pool with `preallocated` slots carved immediately and room
    /// to grow to `capacity` total.  `preallocated` is clamped to
    /// `capacity`.
    pub fn new(preallocated: usize, capacity: usize) -> Self {
        PooledArena {
            store: Store::with_vacant(preallocated.min(capacity)),
            capacity,
        }
    }

    /// The maximum number of slots this pool will ever hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> Arena<K, V> for PooledArena<K, V> {
    fn allocate(&mut self, key: K, value: V) -> Result<NodeRef, AllocError> {
        if let Some(at) = self.store.take_free() {
            self.store.occupy(at, key, value);
            Ok(at)
        } else if self.store.slots.len() < self.capacity {
            Ok(self.store.push_occupied(key, value))
        } else {
            Err(AllocError)
        }
    }

    fn release(&mut self, at: NodeRef) -> (K, V) {
        self.store.release(at)
    }

    fn node(&self, at: NodeRef) -> &Node<K, V> {
        self.store.node(at)
    }

    fn node_mut(&mut self, at: NodeRef) -> &mut Node<K, V> {
        self.store.node_mut(at)
    }

    fn live(&self) -> usize {
        self.store.live
    }
}

/// A fixed arena: exactly `capacity` slots carved at construction, no
/// growth ever.  Allocation fails once the free list runs dry.
pub struct SlabArena<K, V> {
    store: Store<K, V>,
}

impl<K, V> SlabArena<K, V> {
    /// Creates a slab of exactly `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        SlabArena {
            store: Store::with_vacant(capacity),
        }
    }

    /// The slab's fixed slot count.
    pub fn capacity(&self) -> usize {
        self.store.slots.len()
    }
}

impl<K, V> Arena<K, V> for SlabArena<K, V> {
    fn allocate(&mut self, key: K, value: V) -> Result<NodeRef, AllocError> {
        let at = self.store.take_free().ok_or(AllocError)?;
        self.store.occupy(at, key, value);
        Ok(at)
    }

    fn release(&mut self, at: NodeRef) -> (K, V) {
        self.store.release(at)
    }

    fn node(&self, at: NodeRef) -> &Node<K, V> {
        self.store.node(at)
    }

    fn node_mut(&mut self, at: NodeRef) -> &mut Node<K, V> {
        self.store.node_mut(at)
    }

    fn live(&self) -> usize {
        self.store.live
    }
}
