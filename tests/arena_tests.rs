use proptest::prelude::*;
use rank_collections::{AllocError, Arena, PooledArena, RankMap, SlabArena};

mod common;
use common::*;

// Fills a bounded map until the arena gives out, then checks that the
// failure point matches the number of distinct keys admitted.
fn check_bounded_fill<A>(arena: A, capacity: usize, u: SmallIntPairs)
where
    A: Arena<u16, u16>,
{
    let mut m = RankMap::new_in(arena);
    let mut admitted = std::collections::BTreeMap::new();

    for (k, v) in u {
        let novel = !admitted.contains_key(&k);
        match m.insert(k, v) {
            Ok(old) => {
                assert_eq!(old, admitted.insert(k, v));
            }
            Err(AllocError) => {
                assert!(novel);
                assert_eq!(admitted.len(), capacity);
            }
        }
        m.chk();
    }

    assert!(m.iter().eq(admitted.iter().map(|(k, v)| (k, v))));
}

fn check_release_then_refill(u: SmallIntPairs) {
    let mut m = RankMap::new_in(SlabArena::new(64));
    for (k, v) in u {
        // keep at most 64 live by evicting the smallest first
        if m.insert(k, v) == Err(AllocError) {
            m.remove_first();
            m.insert(k, v).unwrap();
        }
        m.chk();
        assert!(m.len() <= 64);
        assert_eq!(m.arena().live(), m.len());
    }
}

proptest! {
    #[test]
    fn test_slab_fill(u in small_int_pairs()) {
        check_bounded_fill(SlabArena::new(100), 100, u);
    }

    #[test]
    fn test_pool_fill(u in small_int_pairs()) {
        check_bounded_fill(PooledArena::new(10, 100), 100, u);
    }

    #[test]
    fn test_release_then_refill(u in small_int_pairs()) {
        check_release_then_refill(u);
    }
}

#[test]
fn failed_insert_is_a_no_op() {
    let mut m = RankMap::new_in(SlabArena::new(4));
    for k in [7u16, 3, 9, 5] {
        m.insert(k, k).unwrap();
    }

    assert_eq!(m.insert(1, 1), Err(AllocError));
    m.chk();
    assert_eq!(m.keys_to_vec(), vec![3, 5, 7, 9]);

    // an overwrite needs no new node, so it succeeds at capacity
    assert_eq!(m.insert(9, 90), Ok(Some(9)));
    assert_eq!(m.get(&9), Some(&90));
}

#[test]
fn pool_preallocation_does_not_shrink_capacity() {
    let mut m = RankMap::new_in(PooledArena::new(0, 3));
    for k in 0u16..3 {
        m.insert(k, k).unwrap();
    }
    assert_eq!(m.insert(3, 3), Err(AllocError));
    assert_eq!(m.arena().capacity(), 3);

    m.remove(&1);
    assert_eq!(m.insert(3, 3), Ok(None));
}

#[test]
fn clear_returns_all_slots() {
    let mut m = RankMap::new_in(SlabArena::new(8));
    for k in 0u16..8 {
        m.insert(k, k).unwrap();
    }
    assert_eq!(m.insert(8, 8), Err(AllocError));

    m.clear();
    assert_eq!(m.arena().live(), 0);

    for k in 8u16..16 {
        m.insert(k, k).unwrap();
    }
    assert_eq!(m.len(), 8);
    m.chk();
}
