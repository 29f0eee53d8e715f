//! Strategies for generating indices, multi indices and elements.
use crate::element::{CellShape, FiniteElement};
use crate::index::{Index, IndexAllocator, IndexKind};
use crate::multi_index::MultiIndex;
use ::proptest::prelude::*;

impl Arbitrary for CellShape {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(CellShape::Vertex),
            Just(CellShape::Interval),
            Just(CellShape::Triangle),
            Just(CellShape::Quadrilateral),
            Just(CellShape::Tetrahedron),
            Just(CellShape::Hexahedron),
        ]
        .boxed()
    }
}

/// Kinds that can be drawn from an [`IndexAllocator`].
pub fn allocatable_kind() -> impl Strategy<Value = IndexKind> {
    prop_oneof![
        Just(IndexKind::Primary),
        Just(IndexKind::Secondary),
        Just(IndexKind::Function),
        Just(IndexKind::Projection),
        Just(IndexKind::Constant),
    ]
}

fn allocate(allocator: &mut IndexAllocator, kind: IndexKind) -> Index {
    match kind {
        IndexKind::Primary => allocator.primary(),
        IndexKind::Secondary => allocator.secondary(),
        IndexKind::Function => allocator.function(),
        IndexKind::Projection => allocator.projection(),
        IndexKind::Constant => allocator.constant(),
        _ => unreachable!("Only allocatable kinds are generated"),
    }
}

/// Sequences of freshly allocated indices, all drawn from the same allocator.
pub fn allocated_indices(max_len: usize) -> impl Strategy<Value = Vec<Index>> {
    prop::collection::vec(allocatable_kind(), 0..=max_len).prop_map(|kinds| {
        let mut allocator = IndexAllocator::new();
        kinds
            .into_iter()
            .map(|kind| allocate(&mut allocator, kind))
            .collect()
    })
}

/// Primary or secondary indices with a range of distinct, sorted values.
pub fn ranged_index() -> impl Strategy<Value = Index> {
    let kind = prop_oneof![Just(IndexKind::Primary), Just(IndexKind::Secondary)];
    let range = prop::collection::btree_set(0..20usize, 1..5);
    (kind, 0..4usize, range).prop_map(|(kind, slot, range)| {
        let mut allocator = IndexAllocator::new();
        let mut index = allocate(&mut allocator, kind);
        for _ in 0..slot {
            index = allocate(&mut allocator, kind);
        }
        index.with_range(range)
    })
}

/// Multi indices of small rank and small dimensions, possibly including zero dimensions.
pub fn multi_index(max_rank: usize, max_dim: usize) -> impl Strategy<Value = MultiIndex> {
    prop::collection::vec(0..=max_dim, 0..=max_rank).prop_map(MultiIndex::new)
}

/// Scalar Lagrange elements of low degree.
pub fn lagrange_element(max_degree: usize) -> impl Strategy<Value = FiniteElement> {
    (any::<CellShape>(), 1..=max_degree).prop_map(|(shape, degree)| FiniteElement::lagrange(shape, degree))
}
