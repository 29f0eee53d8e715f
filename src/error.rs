//! Errors produced while computing reference tensors.
use crate::element::CellShape;
use crate::index::IndexKind;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Library-wide error type.
///
/// Every error aborts the computation of the current term: there is no partially
/// computed reference tensor.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Arithmetic on an index that has no range to operate on, or that would produce
    /// a negative index value.
    RangeError(String),
    /// Two indices with overlapping ranges were added.
    RangeConflict { left: Vec<usize>, right: Vec<usize> },
    /// Two indices of different, non-fixed kinds were added.
    IncompatibleIndexKinds { left: IndexKind, right: IndexKind },
    /// An index was evaluated without a binding for its kind.
    MissingCoordinates { kind: IndexKind, slot: usize },
    /// An index of a kind that has no coordinate group was evaluated.
    UnevaluableIndex { kind: IndexKind },
    /// An index cannot be reassigned from one kind to another.
    InvalidReassignment { from: IndexKind, to: IndexKind },
    /// A basis function carries more than one component index.
    UnsupportedRank { rank: usize },
    /// A basis function of a vector-valued element carries no component index.
    MissingComponent { value_rank: usize },
    /// An index of a kind that has no meaning in the reference tensor was encountered.
    UnexpectedIndexKind { kind: IndexKind, slot: usize },
    /// A fixed index selects a value outside of its axis.
    IndexOutOfBounds { value: usize, dimension: usize },
    /// No table declares the dimension of an auxiliary index.
    UnresolvedAuxiliaryDimension { slot: usize },
    /// Two tables disagree on the dimension of an auxiliary index.
    InconsistentAuxiliaryDimension { slot: usize, first: usize, second: usize },
    /// No factor of the monomial declares the given index.
    UnresolvedIndexDimension { kind: IndexKind, slot: usize },
    /// The monomial has no basis functions.
    EmptyMonomial,
    /// The factors of a monomial are defined on different cells.
    MixedCellShapes { expected: CellShape, found: CellShape },
    /// The operation is not supported on the given cell shape.
    UnsupportedShape(CellShape),
    /// The facet number is out of range for the cell shape.
    InvalidFacet { shape: CellShape, facet: usize },
    /// The tabulation returned by the element evaluator lacks a requested entry.
    MissingTabulation {
        element: String,
        component: usize,
        counts: Vec<usize>,
    },
    /// A table returned by the element evaluator has the wrong shape. Shapes are given as
    /// (basis functions, points).
    InvalidTabulation {
        element: String,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// The element of a factor was never tabulated.
    UntabulatedElement { element: String },
    /// The nodal basis of an element could not be constructed.
    SingularBasis { element: String },
    /// No quadrature rule is available for the requested parameters.
    Quadrature(reftensor_quadrature::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::RangeError(message) => write!(f, "{}", message),
            Self::RangeConflict { left, right } => {
                write!(f, "Cannot add indices with overlapping ranges {:?} and {:?}", left, right)
            }
            Self::IncompatibleIndexKinds { left, right } => {
                write!(f, "Cannot add indices of non-compatible kinds {:?} and {:?}", left, right)
            }
            Self::MissingCoordinates { kind, slot } => {
                write!(f, "Missing index values for {:?} index {}", kind, slot)
            }
            Self::UnevaluableIndex { kind } => write!(f, "Indices of kind {:?} cannot be evaluated", kind),
            Self::InvalidReassignment { from, to } => {
                write!(f, "Cannot reassign an index of kind {:?} to kind {:?}", from, to)
            }
            Self::UnsupportedRank { rank } => {
                write!(f, "Can only handle rank 0 or rank 1 tensors, found {} component indices", rank)
            }
            Self::MissingComponent { value_rank } => {
                write!(f, "Basis function of a rank {} element is missing a component index", value_rank)
            }
            Self::UnexpectedIndexKind { kind, slot } => {
                write!(f, "Unexpected index of kind {:?} (slot {}) in reference tensor", kind, slot)
            }
            Self::IndexOutOfBounds { value, dimension } => {
                write!(f, "Fixed index {} is out of bounds for dimension {}", value, dimension)
            }
            Self::UnresolvedAuxiliaryDimension { slot } => {
                write!(f, "Unable to compute the shape of auxiliary index {}", slot)
            }
            Self::InconsistentAuxiliaryDimension { slot, first, second } => write!(
                f,
                "Auxiliary index {} has inconsistent dimensions {} and {}",
                slot, first, second
            ),
            Self::UnresolvedIndexDimension { kind, slot } => {
                write!(f, "Unable to find dimension for {:?} index {}", kind, slot)
            }
            Self::EmptyMonomial => write!(f, "Monomial has no basis functions"),
            Self::MixedCellShapes { expected, found } => {
                write!(f, "Monomial mixes cell shapes {} and {}", expected, found)
            }
            Self::UnsupportedShape(shape) => write!(f, "Unsupported cell shape {}", shape),
            Self::InvalidFacet { shape, facet } => write!(f, "Cell shape {} has no facet {}", shape, facet),
            Self::MissingTabulation {
                element,
                component,
                counts,
            } => write!(
                f,
                "Tabulation of {} has no entry for component {} and derivative counts {:?}",
                element, component, counts
            ),
            Self::InvalidTabulation {
                element,
                expected,
                found,
            } => write!(
                f,
                "Tabulation of {} has shape {:?}, expected {:?}",
                element, found, expected
            ),
            Self::UntabulatedElement { element } => write!(f, "Element {} was not tabulated", element),
            Self::SingularBasis { element } => write!(f, "Unable to construct the nodal basis of {}", element),
            Self::Quadrature(error) => write!(f, "Quadrature error: {}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Quadrature(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reftensor_quadrature::Error> for Error {
    fn from(error: reftensor_quadrature::Error) -> Self {
        Self::Quadrature(error)
    }
}
