use proptest::prelude::*;

#[allow(dead_code)]
pub(super) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(mut i: I, mut j: J)
where
    I::Item: std::fmt::Debug + Eq, // same inferred for J::Item
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

pub(super) type SmallIntPairs = Vec<(u16, u16)>;

// narrow key range so inserts collide and deletes actually hit
pub(super) fn small_int_pairs() -> impl Strategy<Value = SmallIntPairs> {
    prop::collection::vec((0u16..256u16, 0u16..1024u16), 0..256)
}

#[allow(dead_code)]
pub(super) fn small_int_keys() -> impl Strategy<Value = Vec<u16>> {
    prop::collection::vec(0u16..256u16, 0..256)
}
