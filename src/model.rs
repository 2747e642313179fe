//! Model-based checking of [`AvlTree`] against [`BTreeSet`].
//!
//! Shared by the crate's property tests and its fuzz targets.

extern crate std;

use std::{collections::BTreeSet, fmt::Write, prelude::v1::*};

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::AvlTree;

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    /// Picks an existing key (by position modulo the number of keys) when the tree is non-empty.
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Erase(ItemValue),
    Contains(ItemValue),
    First,
    Last,
    Clear,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(sorted, item)),
            Op::Erase(item) => FinalOp::Erase(get_value(sorted, item)),
            Op::Contains(item) => FinalOp::Contains(get_value(sorted, item)),
            Op::First => FinalOp::First,
            Op::Last => FinalOp::Last,
            Op::Clear => FinalOp::Clear,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Erase(u32),
    Contains(u32),
    First,
    Last,
    Clear,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        // Weight insertion so that trees grow deep enough to exercise rotations.
        4 => value_strategy().prop_map(Op::Insert),
        3 => value_strategy().prop_map(Op::Erase),
        1 => value_strategy().prop_map(Op::Contains),
        1 => Just(Op::First),
        1 => Just(Op::Last),
        1 => Just(Op::Clear),
    ]
}

pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut btree = BTreeSet::new();
    let mut avl: AvlTree<u32> = AvlTree::new();

    for (op_id, op) in ops.into_iter().enumerate() {
        let sorted_values: Vec<u32> = btree.iter().copied().collect();
        let final_op = op.finalize(&sorted_values);

        match final_op {
            FinalOp::Insert(value) => {
                let before = avl.serialize();
                let was_present = !btree.insert(value);

                avl.insert(value);

                if was_present {
                    assert_eq!(before, avl.serialize(), "FinalOp #{op_id}: {final_op:?}");
                }
            }

            FinalOp::Erase(value) => {
                let before = avl.serialize();
                let was_present = btree.remove(&value);

                avl.erase(&value);

                if !was_present {
                    assert_eq!(before, avl.serialize(), "FinalOp #{op_id}: {final_op:?}");
                }
            }

            FinalOp::Contains(value) => {
                assert_eq!(
                    btree.contains(&value),
                    avl.contains(&value),
                    "FinalOp #{op_id}: {final_op:?}"
                );
                assert_eq!(btree.get(&value), avl.get(&value));
            }

            FinalOp::First => {
                assert_eq!(btree.first(), avl.first(), "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                assert_eq!(btree.last(), avl.last(), "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Clear => {
                btree.clear();
                avl.clear();
            }
        }

        avl.assert_invariants();
        assert_eq!(btree.len(), avl.len());
        assert!(btree.iter().eq(avl.iter()), "FinalOp #{op_id}: {final_op:?}");

        let mut expected = String::new();
        for value in &btree {
            write!(expected, "{value},").unwrap();
        }
        assert_eq!(expected, avl.serialize(), "FinalOp #{op_id}: {final_op:?}");
    }
}
