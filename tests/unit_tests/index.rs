use proptest::prelude::*;
use reftensor::index::{Index, IndexAllocator, IndexKind, IndexValues};
use reftensor::proptest::{allocated_indices, ranged_index};
use reftensor::Error;

#[test]
fn allocator_hands_out_consecutive_slots_per_kind() {
    let mut allocator = IndexAllocator::new();
    assert_eq!(allocator.primary().slot(), 0);
    assert_eq!(allocator.primary().slot(), 1);
    assert_eq!(allocator.secondary().slot(), 0);
    assert_eq!(allocator.primary().slot(), 2);
    assert_eq!(allocator.function().slot(), 0);
    assert_eq!(allocator.constant().slot(), 0);
    assert_eq!(allocator.projection().slot(), 0);
    assert_eq!(allocator.secondary().slot(), 1);

    allocator.reset();
    assert_eq!(allocator.primary().slot(), 0);
    assert_eq!(allocator.secondary().slot(), 0);
    assert_eq!(allocator, {
        let mut expected = IndexAllocator::new();
        expected.primary();
        expected.secondary();
        expected
    });
}

#[test]
fn allocated_indices_have_expected_ranges() {
    let mut allocator = IndexAllocator::new();
    assert_eq!(allocator.primary().range(), None);
    assert_eq!(allocator.secondary().range(), None);
    allocator.function();
    assert_eq!(allocator.function().range(), Some([1].as_slice()));
    assert_eq!(allocator.projection().range(), Some([0].as_slice()));
    assert_eq!(allocator.constant().range(), Some([0].as_slice()));
    assert_eq!(Index::fixed(4).range(), Some([4].as_slice()));
}

#[test]
fn structural_equality_ignores_range() {
    let mut allocator = IndexAllocator::new();
    let i = allocator.primary();
    let i_ranged = i.with_range([0, 1]);
    let j = allocator.primary();
    let a = allocator.secondary();

    assert!(i.structurally_eq(&i_ranged));
    assert!(!i.strictly_eq(&i_ranged));
    assert!(i_ranged.strictly_eq(&i.with_range(vec![0, 1])));
    assert!(!i.structurally_eq(&j));

    // Primary and secondary slot 0 are different indices
    assert_eq!(i.slot(), a.slot());
    assert!(!i.structurally_eq(&a));
    assert!(Index::fixed(2).strictly_eq(&Index::fixed(2)));
    assert!(!Index::fixed(2).structurally_eq(&Index::fixed(3)));
}

#[test]
fn offset_shifts_fixed_values_and_ranges() {
    let mut allocator = IndexAllocator::new();
    let shifted = Index::fixed(1).offset(2).unwrap();
    assert!(shifted.strictly_eq(&Index::fixed(3)));
    assert!(Index::fixed(3).offset(-3).unwrap().strictly_eq(&Index::fixed(0)));

    let i = allocator.primary().with_range([0, 1]);
    let shifted = i.offset(3).unwrap();
    assert!(shifted.structurally_eq(&i));
    assert_eq!(shifted.range(), Some([3, 4].as_slice()));

    let a = allocator.secondary();
    assert!(a.offset(0).unwrap().strictly_eq(&a));
}

#[test]
fn offset_rejects_invalid_shifts() {
    let mut allocator = IndexAllocator::new();
    let a = allocator.secondary();
    assert!(matches!(a.offset(1), Err(Error::RangeError(_))));
    assert!(matches!(a.with_range([]).offset(1), Err(Error::RangeError(_))));
    assert!(matches!(Index::fixed(1).offset(-2), Err(Error::RangeError(_))));
    assert!(matches!(
        allocator.primary().with_range([1, 2]).offset(-2),
        Err(Error::RangeError(_))
    ));
}

#[test]
fn join_of_fixed_indices_allocates_secondary() {
    let mut allocator = IndexAllocator::new();
    allocator.secondary();
    let joined = Index::fixed(1).join(&Index::fixed(0), &mut allocator).unwrap();
    assert_eq!(joined.kind(), IndexKind::Secondary);
    assert_eq!(joined.slot(), 1);
    assert_eq!(joined.range(), Some([0, 1].as_slice()));
    assert_eq!(allocator.secondary().slot(), 2);
}

#[test]
fn join_keeps_kind_of_non_fixed_index() {
    let mut allocator = IndexAllocator::new();
    let i = allocator.primary().with_range([2, 3]);

    let joined = Index::fixed(0).join(&i, &mut allocator).unwrap();
    assert!(joined.structurally_eq(&i));
    assert_eq!(joined.range(), Some([0, 2, 3].as_slice()));

    let joined = i.join(&Index::fixed(5), &mut allocator).unwrap();
    assert!(joined.structurally_eq(&i));
    assert_eq!(joined.range(), Some([2, 3, 5].as_slice()));

    let other = allocator.primary().with_range([0]);
    let joined = i.join(&other, &mut allocator).unwrap();
    assert!(joined.structurally_eq(&i));
    assert_eq!(joined.range(), Some([0, 2, 3].as_slice()));
}

#[test]
fn join_rejects_invalid_operands() {
    let mut allocator = IndexAllocator::new();
    let i = allocator.primary();
    let a = allocator.secondary().with_range([4]);

    assert!(matches!(i.join(&a, &mut allocator), Err(Error::RangeError(_))));
    assert!(matches!(a.join(&i, &mut allocator), Err(Error::RangeError(_))));

    assert_eq!(
        Index::fixed(1).join(&Index::fixed(1), &mut allocator).unwrap_err(),
        Error::RangeConflict {
            left: vec![1],
            right: vec![1]
        }
    );

    let i = i.with_range([0, 1]);
    assert_eq!(
        i.join(&a, &mut allocator).unwrap_err(),
        Error::IncompatibleIndexKinds {
            left: IndexKind::Primary,
            right: IndexKind::Secondary
        }
    );

    // Failed joins do not consume slots
    assert_eq!(allocator.secondary().slot(), 1);
}

#[test]
fn reassign_promotes_secondary_indices_only() {
    let mut allocator = IndexAllocator::new();
    let a = allocator.secondary().with_range([0, 1]);
    let b = a.reassign(IndexKind::AuxiliaryReference, 3).unwrap();
    assert_eq!(b.key(), (IndexKind::AuxiliaryReference, 3));
    assert_eq!(b.range(), Some([0, 1].as_slice()));

    let generic = a.reassign(IndexKind::Auxiliary, 0).unwrap();
    let geometry = generic.reassign(IndexKind::AuxiliaryGeometry, 0).unwrap();
    assert_eq!(geometry.kind(), IndexKind::AuxiliaryGeometry);

    assert_eq!(
        allocator.primary().reassign(IndexKind::AuxiliaryReference, 0).unwrap_err(),
        Error::InvalidReassignment {
            from: IndexKind::Primary,
            to: IndexKind::AuxiliaryReference
        }
    );
    assert!(b.reassign(IndexKind::AuxiliaryGeometry, 0).is_err());
}

#[test]
fn evaluate_looks_up_coordinates_by_kind() {
    let mut allocator = IndexAllocator::new();
    let i0 = allocator.primary();
    let i1 = allocator.primary();
    let a0 = allocator.secondary();
    let b1 = allocator
        .secondary()
        .reassign(IndexKind::AuxiliaryReference, 1)
        .unwrap();
    let g0 = allocator
        .secondary()
        .reassign(IndexKind::AuxiliaryGeometry, 0)
        .unwrap();

    let values = IndexValues::new()
        .with_primary(&[3, 5])
        .with_secondary(&[7])
        .with_auxiliary_reference(&[0, 2])
        .with_auxiliary_geometry(&[4]);
    assert_eq!(Index::fixed(9).evaluate(&values), Ok(9));
    assert_eq!(i0.evaluate(&values), Ok(3));
    assert_eq!(i1.evaluate(&values), Ok(5));
    assert_eq!(a0.evaluate(&values), Ok(7));
    assert_eq!(b1.evaluate(&values), Ok(2));
    assert_eq!(g0.evaluate(&values), Ok(4));
}

#[test]
fn evaluate_fails_for_missing_or_unevaluable_coordinates() {
    let mut allocator = IndexAllocator::new();
    let i0 = allocator.primary();
    let i1 = allocator.primary();
    let a0 = allocator.secondary();

    let values = IndexValues::new().with_primary(&[3]);
    assert_eq!(
        i1.evaluate(&values),
        Err(Error::MissingCoordinates {
            kind: IndexKind::Primary,
            slot: 1
        })
    );
    assert_eq!(
        a0.evaluate(&values),
        Err(Error::MissingCoordinates {
            kind: IndexKind::Secondary,
            slot: 0
        })
    );
    assert_eq!(i0.evaluate(&IndexValues::new()).unwrap_err().to_string(), "Missing index values for Primary index 0");
    assert_eq!(
        allocator.function().evaluate(&values),
        Err(Error::UnevaluableIndex {
            kind: IndexKind::Function
        })
    );
}

#[test]
fn index_display() {
    let mut allocator = IndexAllocator::new();
    let i0 = allocator.primary();
    let a0 = allocator.secondary();
    let a1 = allocator.secondary();
    let b0 = a0.reassign(IndexKind::AuxiliaryReference, 0).unwrap();

    insta::assert_snapshot!(Index::fixed(3).to_string(), @"3");
    insta::assert_snapshot!(i0.with_range([0, 1]).to_string(), @"i0[0, 1]");
    insta::assert_snapshot!(i0.to_string(), @"i0");
    insta::assert_snapshot!(a1.to_string(), @"a1");
    insta::assert_snapshot!(b0.to_string(), @"b0");
    insta::assert_snapshot!(allocator.function().to_string(), @"0");
}

proptest! {
    #[test]
    fn fresh_indices_are_pairwise_structurally_distinct(indices in allocated_indices(12)) {
        for (n, first) in indices.iter().enumerate() {
            for second in &indices[n + 1..] {
                prop_assert!(!first.structurally_eq(second));
            }
        }
    }

    #[test]
    fn structural_equality_is_implied_by_strict_equality(a in ranged_index(), b in ranged_index()) {
        if a.strictly_eq(&b) {
            prop_assert!(a.structurally_eq(&b));
        }
        prop_assert!(a.strictly_eq(&a.clone()));
        prop_assert_eq!(a.structurally_eq(&b), b.structurally_eq(&a));
    }

    #[test]
    fn join_produces_sorted_disjoint_union(a in ranged_index(), b in ranged_index()) {
        let mut allocator = IndexAllocator::new();
        let left = a.range().unwrap().to_vec();
        let right = b.range().unwrap().to_vec();
        let overlapping = left.iter().any(|r| right.contains(r));
        match a.join(&b, &mut allocator) {
            Ok(joined) => {
                prop_assert!(!overlapping);
                prop_assert_eq!(a.kind(), b.kind());
                let range = joined.range().unwrap();
                prop_assert_eq!(range.len(), left.len() + right.len());
                prop_assert!(range.windows(2).all(|w| w[0] < w[1]));
            }
            Err(Error::RangeConflict { .. }) => prop_assert!(overlapping),
            Err(Error::IncompatibleIndexKinds { left, right }) => {
                prop_assert!(!overlapping);
                prop_assert_ne!(left, right);
            }
            Err(error) => prop_assert!(false, "unexpected error {}", error),
        }
    }

    #[test]
    fn offset_round_trips_for_ranged_indices(index in ranged_index(), delta in 0..10isize) {
        let shifted = index.offset(delta).unwrap();
        let restored = shifted.offset(-delta).unwrap();
        prop_assert!(restored.strictly_eq(&index));
    }
}
