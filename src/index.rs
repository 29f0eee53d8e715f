//! Symbolic tensor indices.
//!
//! An [`Index`] labels one axis of a tensor appearing in a monomial. Its [`IndexKind`]
//! decides how the axis is treated when the reference tensor is computed:
//!
//! - `Fixed` indices select a single value and are contracted away immediately,
//! - `Primary` indices range over the arguments (test and trial functions) of the form,
//! - `Secondary` indices range over summations internal to the form,
//! - `AuxiliaryReference` indices are summed over during reference tensor construction,
//! - `AuxiliaryGeometry` indices are summed over when the geometry tensor is computed.
//!
//! Slots are handed out by an [`IndexAllocator`], which must be shared by all monomials
//! of a single form and reset between independent forms.
use crate::error::Error;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// The kind of an index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndexKind {
    Fixed,
    Primary,
    Secondary,
    /// An auxiliary index that has not yet been attributed to either tensor.
    Auxiliary,
    Function,
    Projection,
    Constant,
    /// Auxiliary index local to the reference tensor.
    AuxiliaryReference,
    /// Auxiliary index local to the geometry tensor.
    AuxiliaryGeometry,
}

/// A symbolic tensor index.
///
/// `Index` deliberately does not implement `PartialEq`. Whether two indices are the same
/// depends on the context: see [`Index::structurally_eq`] and [`Index::strictly_eq`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    kind: IndexKind,
    slot: usize,
    range: Option<Vec<usize>>,
}

/// Coordinate values for each group of evaluable indices.
///
/// A group that is `None` is considered unbound, and evaluating an index of that kind
/// fails with [`Error::MissingCoordinates`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct IndexValues<'a> {
    pub primary: Option<&'a [usize]>,
    pub secondary: Option<&'a [usize]>,
    pub auxiliary_reference: Option<&'a [usize]>,
    pub auxiliary_geometry: Option<&'a [usize]>,
}

impl<'a> IndexValues<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primary(self, values: &'a [usize]) -> Self {
        Self {
            primary: Some(values),
            ..self
        }
    }

    pub fn with_secondary(self, values: &'a [usize]) -> Self {
        Self {
            secondary: Some(values),
            ..self
        }
    }

    pub fn with_auxiliary_reference(self, values: &'a [usize]) -> Self {
        Self {
            auxiliary_reference: Some(values),
            ..self
        }
    }

    pub fn with_auxiliary_geometry(self, values: &'a [usize]) -> Self {
        Self {
            auxiliary_geometry: Some(values),
            ..self
        }
    }
}

impl Index {
    /// Creates a fixed index with the given value.
    pub fn fixed(value: usize) -> Self {
        Self {
            kind: IndexKind::Fixed,
            slot: value,
            range: Some(vec![value]),
        }
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    /// The identity of the index within its kind. For fixed indices, this is the value.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn range(&self) -> Option<&[usize]> {
        self.range.as_deref()
    }

    pub fn is_fixed(&self) -> bool {
        self.kind == IndexKind::Fixed
    }

    /// Returns the `(kind, slot)` pair that identifies the index structurally.
    pub fn key(&self) -> (IndexKind, usize) {
        (self.kind, self.slot)
    }

    /// Returns a copy of the index with the given range.
    pub fn with_range(&self, range: impl IntoIterator<Item = usize>) -> Self {
        Self {
            range: Some(range.into_iter().collect()),
            ..self.clone()
        }
    }

    /// Structural equality: kind and slot agree, ranges are ignored.
    ///
    /// The same symbolic index may index two tensors with different ranges in a summation,
    /// so this is the notion used for identifying indices across factors.
    pub fn structurally_eq(&self, other: &Index) -> bool {
        self.key() == other.key()
    }

    /// Strict equality: kind, slot and range all agree.
    pub fn strictly_eq(&self, other: &Index) -> bool {
        self.structurally_eq(other) && self.range == other.range
    }

    fn non_empty_range(&self) -> Option<&[usize]> {
        self.range().filter(|range| !range.is_empty())
    }

    /// Shifts the index by an integer offset.
    ///
    /// A fixed index changes its value, an index with a range has every element of its
    /// range shifted. A zero offset leaves an index without range untouched, whereas a
    /// nonzero offset is an error.
    pub fn offset(&self, delta: isize) -> Result<Index, Error> {
        let shift = |value: usize| {
            value
                .checked_add_signed(delta)
                .ok_or_else(|| Error::RangeError(format!("Shifting index {} by {} gives a negative value", self, delta)))
        };

        if self.is_fixed() {
            Ok(Index::fixed(shift(self.slot)?))
        } else if let Some(range) = self.non_empty_range() {
            let range = range.iter().map(|&r| shift(r)).collect::<Result<Vec<_>, _>>()?;
            Ok(self.with_range(range))
        } else if delta == 0 {
            Ok(self.clone())
        } else {
            Err(Error::RangeError(format!(
                "Cannot add integer {} to index {} without range",
                delta, self
            )))
        }
    }

    /// Adds two indices, producing an index over the union of their ranges.
    ///
    /// Adding two fixed indices produces a new secondary index, drawn from `allocator`.
    pub fn join(&self, other: &Index, allocator: &mut IndexAllocator) -> Result<Index, Error> {
        let (left, right) = match (self.non_empty_range(), other.non_empty_range()) {
            (Some(left), Some(right)) => (left, right),
            _ => {
                return Err(Error::RangeError(format!(
                    "Cannot add index {} to index {} without range",
                    other, self
                )))
            }
        };

        if left.iter().any(|r| right.contains(r)) {
            return Err(Error::RangeConflict {
                left: left.to_vec(),
                right: right.to_vec(),
            });
        }

        let range: Vec<usize> = left.iter().chain(right).copied().sorted_unstable().collect();

        use IndexKind::Fixed;
        match (self.kind, other.kind) {
            (Fixed, Fixed) => Ok(allocator.secondary().with_range(range)),
            (Fixed, _) => Ok(other.with_range(range)),
            (_, Fixed) => Ok(self.with_range(range)),
            (left, right) if left == right => Ok(self.with_range(range)),
            (left, right) => Err(Error::IncompatibleIndexKinds { left, right }),
        }
    }

    /// Reassigns a secondary (or not yet attributed auxiliary) index to an auxiliary kind.
    ///
    /// This is the hook through which the classification of summation indices is applied.
    /// The classification itself is decided by the caller.
    pub fn reassign(&self, kind: IndexKind, slot: usize) -> Result<Index, Error> {
        use IndexKind::*;
        match (self.kind, kind) {
            (Secondary, Auxiliary | AuxiliaryReference | AuxiliaryGeometry)
            | (Auxiliary, AuxiliaryReference | AuxiliaryGeometry) => Ok(Index {
                kind,
                slot,
                range: self.range.clone(),
            }),
            (from, to) => Err(Error::InvalidReassignment { from, to }),
        }
    }

    /// Evaluates the index for the given coordinate values.
    pub fn evaluate(&self, values: &IndexValues) -> Result<usize, Error> {
        use IndexKind::*;
        let group = match self.kind {
            Fixed => return Ok(self.slot),
            Primary => values.primary,
            Secondary => values.secondary,
            AuxiliaryReference => values.auxiliary_reference,
            AuxiliaryGeometry => values.auxiliary_geometry,
            Auxiliary | Function | Projection | Constant => return Err(Error::UnevaluableIndex { kind: self.kind }),
        };
        group
            .and_then(|values| values.get(self.slot))
            .copied()
            .ok_or(Error::MissingCoordinates {
                kind: self.kind,
                slot: self.slot,
            })
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use IndexKind::*;
        match self.kind {
            Fixed | Function | Projection | Constant => return write!(f, "{}", self.slot),
            Primary => write!(f, "i{}", self.slot)?,
            Secondary => write!(f, "a{}", self.slot)?,
            Auxiliary | AuxiliaryReference | AuxiliaryGeometry => write!(f, "b{}", self.slot)?,
        }
        match self.non_empty_range() {
            Some(range) => write!(f, "{:?}", range),
            None => Ok(()),
        }
    }
}

/// Hands out index slots, one counter per allocatable kind.
///
/// One allocator is used per compilation job. Slots restart at zero after [`reset`], which
/// keeps the generated names reproducible between independent compilations.
///
/// [`reset`]: IndexAllocator::reset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexAllocator {
    next_primary: usize,
    next_secondary: usize,
    next_function: usize,
    next_projection: usize,
    next_constant: usize,
}

fn take_next(counter: &mut usize) -> usize {
    *counter += 1;
    *counter - 1
}

impl IndexAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new primary index without range.
    pub fn primary(&mut self) -> Index {
        Index {
            kind: IndexKind::Primary,
            slot: take_next(&mut self.next_primary),
            range: None,
        }
    }

    /// Creates a new secondary index without range.
    pub fn secondary(&mut self) -> Index {
        Index {
            kind: IndexKind::Secondary,
            slot: take_next(&mut self.next_secondary),
            range: None,
        }
    }

    pub fn function(&mut self) -> Index {
        Self::singleton(IndexKind::Function, take_next(&mut self.next_function))
    }

    pub fn projection(&mut self) -> Index {
        Self::singleton(IndexKind::Projection, take_next(&mut self.next_projection))
    }

    pub fn constant(&mut self) -> Index {
        Self::singleton(IndexKind::Constant, take_next(&mut self.next_constant))
    }

    fn singleton(kind: IndexKind, slot: usize) -> Index {
        Index {
            kind,
            slot,
            range: Some(vec![slot]),
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
