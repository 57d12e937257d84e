use proptest::prelude::*;
use rank_collections::{Arena, RankMap};
use std::collections::BTreeMap as StdMap;
use std::ops::Bound::*;

mod common;
use common::*;

// A RankMap and a std::collections::BTreeMap driven in lockstep.
struct Maps {
    rank_map: RankMap<u16, u16>,
    std_map: StdMap<u16, u16>,
}

impl Maps {
    fn new(v: SmallIntPairs) -> Maps {
        let mut maps = Maps {
            rank_map: RankMap::new(),
            std_map: StdMap::new(),
        };
        for (k, v) in v {
            assert_eq!(maps.rank_map.insert(k, v).unwrap(), maps.std_map.insert(k, v));
        }
        maps.chk();
        maps
    }

    fn chk(&self) {
        self.rank_map.chk();
        assert_eq!(self.rank_map.len(), self.std_map.len());
        assert_eq_iters(self.rank_map.iter(), self.std_map.iter());
    }
}

fn check_insert_remove(u: SmallIntPairs, doomed: Vec<u16>) {
    let mut maps = Maps::new(u);

    for k in doomed {
        assert_eq!(maps.rank_map.remove(&k), maps.std_map.remove(&k));
        maps.rank_map.chk();
    }

    maps.chk();
}

fn check_rank_queries(u: SmallIntPairs) {
    let maps = Maps::new(u);

    for (i, (k, v)) in maps.std_map.iter().enumerate() {
        assert_eq!(maps.rank_map.nth(i), Some((k, v)));
    }
    assert_eq!(maps.rank_map.nth(maps.std_map.len()), None);

    assert_eq!(
        maps.rank_map.first_key_value(),
        maps.std_map.first_key_value()
    );
    assert_eq!(
        maps.rank_map.last_key_value(),
        maps.std_map.last_key_value()
    );
}

fn check_neighbor_queries(u: SmallIntPairs, probes: Vec<u16>) {
    let maps = Maps::new(u);

    for p in probes {
        let higher = maps.std_map.range((Excluded(p), Unbounded)).next();
        let lower = maps.std_map.range((Unbounded, Excluded(p))).next_back();
        assert_eq!(maps.rank_map.higher(&p), higher);
        assert_eq!(maps.rank_map.lower(&p), lower);
    }
}

fn check_get_and_update(u: SmallIntPairs, probes: Vec<u16>) {
    let mut maps = Maps::new(u);

    for p in probes {
        assert_eq!(maps.rank_map.get(&p), maps.std_map.get(&p));
        assert_eq!(
            maps.rank_map.contains_key(&p),
            maps.std_map.contains_key(&p)
        );
        if let Some(v) = maps.rank_map.get_mut(&p) {
            *v = v.wrapping_add(1);
            *maps.std_map.get_mut(&p).unwrap() += 1;
        }
    }

    maps.chk();
}

fn check_remove_ends(u: SmallIntPairs) {
    let mut maps = Maps::new(u);

    while !maps.rank_map.is_empty() {
        assert_eq!(maps.rank_map.remove_first(), maps.std_map.pop_first());
        maps.rank_map.chk();
        assert_eq!(maps.rank_map.remove_last(), maps.std_map.pop_last());
        maps.rank_map.chk();
    }
    assert!(maps.std_map.is_empty());
    assert_eq!(maps.rank_map.arena().live(), 0);
}

fn check_retain(u: SmallIntPairs) {
    let mut maps = Maps::new(u);

    maps.rank_map.retain(|k, v| (*k ^ *v) % 3 != 0);
    maps.std_map.retain(|k, v| (*k ^ *v) % 3 != 0);

    maps.chk();
}

fn check_for_each_mut(u: SmallIntPairs) {
    let mut maps = Maps::new(u);

    maps.rank_map.for_each_mut(|k, v| *v = v.wrapping_add(*k));
    for (k, v) in maps.std_map.iter_mut() {
        *v = v.wrapping_add(*k);
    }

    maps.chk();
}

fn check_fold_and_counts(u: SmallIntPairs) {
    let maps = Maps::new(u);

    let total: u64 = maps.rank_map.fold(0u64, |acc, _, v| acc + u64::from(*v));
    let expected: u64 = maps.std_map.values().map(|&v| u64::from(v)).sum();
    assert_eq!(total, expected);
    assert_eq!(
        maps.rank_map.sum_by(|_, v| u64::from(*v)),
        expected
    );

    let odd = |_: &u16, v: &u16| v % 2 == 1;
    let odd_count = maps.std_map.values().filter(|&&v| v % 2 == 1).count();
    assert_eq!(maps.rank_map.count_matching(odd), odd_count);
    assert_eq!(maps.rank_map.any_match(odd), odd_count > 0);
    assert_eq!(maps.rank_map.all_match(odd), odd_count == maps.std_map.len());
    assert_eq!(maps.rank_map.none_match(odd), odd_count == 0);
}

fn check_bulk_set_ops(u: SmallIntPairs, v: SmallIntPairs) {
    let lhs = Maps::new(u);
    let rhs = Maps::new(v);

    let mut merged = lhs.rank_map.try_clone().unwrap();
    merged.put_all(&rhs.rank_map).unwrap();
    let mut std_merged = lhs.std_map.clone();
    std_merged.extend(rhs.std_map.iter().map(|(&k, &v)| (k, v)));
    merged.chk();
    assert_eq_iters(merged.iter(), std_merged.iter());
    assert!(merged.contains_all(&rhs.rank_map));
    assert!(merged.contains_all(&lhs.rank_map));

    let mut difference = lhs.rank_map.try_clone().unwrap();
    difference.remove_all(&rhs.rank_map);
    difference.chk();
    assert!(difference
        .keys()
        .all(|k| !rhs.rank_map.contains_key(k)));

    let mut intersection = lhs.rank_map.try_clone().unwrap();
    intersection.retain_all(&rhs.rank_map);
    intersection.chk();
    assert_eq_iters(
        intersection.keys(),
        lhs.std_map.keys().filter(|k| rhs.std_map.contains_key(k)),
    );
    assert_eq!(
        difference.len() + intersection.len(),
        lhs.rank_map.len()
    );
}

fn check_equality(u: SmallIntPairs) {
    let maps = Maps::new(u);

    let copy = maps.rank_map.try_clone().unwrap();
    assert_eq!(maps.rank_map, copy);
    assert!(maps.rank_map.eq_by(&copy, |a, b| a == b));
    assert!(maps.rank_map.eq_by(&copy, |a, b| a.1 == b.1));
}

proptest! {
    #[test]
    fn test_insert_remove(u in small_int_pairs(), doomed in small_int_keys()) {
        check_insert_remove(u, doomed);
    }

    #[test]
    fn test_rank_queries(u in small_int_pairs()) {
        check_rank_queries(u);
    }

    #[test]
    fn test_neighbor_queries(u in small_int_pairs(), probes in small_int_keys()) {
        check_neighbor_queries(u, probes);
    }

    #[test]
    fn test_get_and_update(u in small_int_pairs(), probes in small_int_keys()) {
        check_get_and_update(u, probes);
    }

    #[test]
    fn test_remove_ends(u in small_int_pairs()) {
        check_remove_ends(u);
    }

    #[test]
    fn test_retain(u in small_int_pairs()) {
        check_retain(u);
    }

    #[test]
    fn test_for_each_mut(u in small_int_pairs()) {
        check_for_each_mut(u);
    }

    #[test]
    fn test_fold_and_counts(u in small_int_pairs()) {
        check_fold_and_counts(u);
    }

    #[test]
    fn test_bulk_set_ops(u in small_int_pairs(), v in small_int_pairs()) {
        check_bulk_set_ops(u, v);
    }

    #[test]
    fn test_equality(u in small_int_pairs()) {
        check_equality(u);
    }
}

#[test]
fn retain_does_not_skip_neighbors() {
    // adjacent doomed entries must both go, including the first and last
    let mut m = RankMap::try_from_iter((0u16..10).map(|k| (k, k))).unwrap();
    m.retain(|k, _| *k == 4);
    assert_eq!(m.keys_to_vec(), vec![4]);

    let mut m = RankMap::try_from_iter((0u16..10).map(|k| (k, k))).unwrap();
    m.retain(|_, _| false);
    assert!(m.is_empty());
    assert_eq!(m.arena().live(), 0);
}

#[test]
fn eq_by_compares_ranks_not_keys() {
    let a = RankMap::try_from_iter([(1u16, 7u16), (2, 8)]).unwrap();
    let b = RankMap::try_from_iter([(5u16, 7u16), (9, 8)]).unwrap();

    assert!(a.eq_by(&b, |x, y| x.1 == y.1));
    assert!(!a.eq_by(&b, |x, y| x == y));

    let short = RankMap::try_from_iter([(1u16, 7u16)]).unwrap();
    assert!(!a.eq_by(&short, |x, y| x.1 == y.1));
}
