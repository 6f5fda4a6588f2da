// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::counter::value::CounterValue::*;
use proptest::prelude::*;

#[test]
fn increment_identity_is_zero() {
    assert_eq!(IncrementAggregator.identity(), Number(0.0));
}

#[test]
fn increment_combine_adds() {
    let result = IncrementAggregator.combine(Number(3.0), Number(2.0));
    assert_eq!(result, Number(5.0));
}

#[test]
fn merge_numbers_add() {
    let result = MergeAggregator.combine(Number(3.0), Number(2.0));
    assert_eq!(result, Number(5.0));
}

#[test]
fn merge_sequences_concatenate_preserving_order() {
    let a = Sequence(vec![Number(1.0), Number(2.0)]);
    let b = Sequence(vec![Number(3.0)]);
    assert_eq!(MergeAggregator.combine(a, b), Sequence(vec![Number(1.0), Number(2.0), Number(3.0)]));
}

#[test]
fn merge_sets_union_without_duplicates() {
    let a = Set(vec![Number(1.0), Number(2.0)]);
    let b = Set(vec![Number(2.0), Number(3.0)]);
    let Set(mut result) = MergeAggregator.combine(a, b) else { panic!("expected set") };
    result.sort_by(|x, y| x.as_number().unwrap().partial_cmp(&y.as_number().unwrap()).unwrap());
    assert_eq!(result, vec![Number(1.0), Number(2.0), Number(3.0)]);
}

#[test]
fn merge_mappings_recurse_keywise() {
    let mut am = std::collections::BTreeMap::new();
    am.insert("x".to_string(), Number(1.0));
    let mut bm = std::collections::BTreeMap::new();
    bm.insert("x".to_string(), Number(4.0));
    bm.insert("y".to_string(), Number(9.0));
    let result = MergeAggregator.combine(Mapping(am), Mapping(bm));
    let Mapping(m) = result else { panic!("expected mapping") };
    assert_eq!(m.get("x"), Some(&Number(5.0)));
    assert_eq!(m.get("y"), Some(&Number(9.0)));
}

#[test]
fn merge_mismatched_types_right_hand_wins() {
    let result = MergeAggregator.combine(Number(1.0), Sequence(vec![Number(2.0)]));
    assert_eq!(result, Sequence(vec![Number(2.0)]));
}

#[test]
fn merge_identity_bootstraps_first_value_of_any_kind() {
    let identity = MergeAggregator.identity();
    let result = MergeAggregator.combine(identity, Sequence(vec![Number(1.0)]));
    assert_eq!(result, Sequence(vec![Number(1.0)]));
}

#[test]
fn increment_combine_is_commutative() {
    let a = IncrementAggregator.combine(Number(3.0), Number(2.0));
    let b = IncrementAggregator.combine(Number(2.0), Number(3.0));
    assert_eq!(a, b);
}

proptest::proptest! {
    // Increment combine must be associative+commutative (§5) so that
    // concurrent clients syncing in any order converge on the same total.
    #[test]
    fn increment_combine_is_associative(a in -1e6f64..1e6, b in -1e6f64..1e6, c in -1e6f64..1e6) {
        let left = IncrementAggregator.combine(IncrementAggregator.combine(Number(a), Number(b)), Number(c));
        let right = IncrementAggregator.combine(Number(a), IncrementAggregator.combine(Number(b), Number(c)));
        let (Number(left), Number(right)) = (left, right) else { unreachable!() };
        prop_assert!((left - right).abs() < 1e-6);
    }

    // Merge over sequences is associative (concatenation); not commutative
    // (§5 — convergence up to element-set, not element-order).
    #[test]
    fn merge_sequence_combine_is_associative(a in 0i64..5, b in 0i64..5, c in 0i64..5) {
        let seq = |n: i64| Sequence(vec![Number(n as f64)]);
        let left = MergeAggregator.combine(MergeAggregator.combine(seq(a), seq(b)), seq(c));
        let right = MergeAggregator.combine(seq(a), MergeAggregator.combine(seq(b), seq(c)));
        prop_assert_eq!(left, right);
    }
}
