//! # Arena-backed ordered collections with order statistics
//!
//! `rank-collections` provides [`RankMap`], an ordered key/value map built
//! on an AVL-balanced search tree whose nodes carry subtree sizes.  The
//! size augmentation makes rank queries cheap: [`RankMap::nth`] finds the
//! i-th smallest entry in O(log n) without walking the whole tree.
//!
//! Nodes live in an arena chosen by the caller.  [`DynamicArena`] grows
//! without bound, [`PooledArena`] grows lazily up to a capacity and then
//! recycles, and [`SlabArena`] carves all of its storage up front and never
//! grows.  Running out of arena space is a recoverable error
//! ([`AllocError`]), not a panic, and a failed insertion leaves the map
//! untouched.
//!
//! On top of the map sit a circular bidirectional [`Cursor`] and, for
//! integer keys, a deque view (`push_front`/`pop_back` and friends) that
//! synthesizes keys just outside the current key range.

#![warn(missing_docs)]

mod arena;
mod avl;
mod order;

pub use arena::{AllocError, Arena, DynamicArena, Node, NodeRef, PooledArena, SlabArena};
pub use avl::cursor::{Cursor, CursorMut};
pub use avl::deque::DequeKey;
pub use avl::{Iter, RankMap};
pub use order::{Comparator, NaturalOrder, ReverseOrder};
