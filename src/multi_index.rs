use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter::FusedIterator;

/// An ordered tuple of dimensions describing a group of tensor axes.
///
/// Iterating a multi index yields every combination of index values, i.e. the Cartesian
/// product of `0 .. dim` over all axes, in lexicographic order with the first axis varying
/// slowest. A multi index of rank zero yields a single empty combination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MultiIndex {
    dims: Vec<usize>,
}

impl MultiIndex {
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// The number of combinations produced by [`iter`](Self::iter).
    pub fn num_combinations(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns an iterator over all combinations of index values.
    ///
    /// Each call starts a fresh enumeration.
    pub fn iter(&self) -> MultiIndexIter<'_> {
        let next = if self.dims.iter().all(|&dim| dim > 0) {
            Some(vec![0; self.rank()])
        } else {
            None
        };
        MultiIndexIter {
            dims: &self.dims,
            next,
            remaining: self.num_combinations(),
        }
    }
}

impl From<Vec<usize>> for MultiIndex {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

impl Display for MultiIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "rank = {} dims = {:?}", self.rank(), self.dims)
    }
}

impl<'a> IntoIterator for &'a MultiIndex {
    type Item = Vec<usize>;
    type IntoIter = MultiIndexIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy enumeration of the combinations of a [`MultiIndex`].
#[derive(Debug, Clone)]
pub struct MultiIndexIter<'a> {
    dims: &'a [usize],
    next: Option<Vec<usize>>,
    remaining: usize,
}

impl<'a> Iterator for MultiIndexIter<'a> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.remaining -= 1;

        // Advance the last axis, carrying over into the preceding ones
        let mut successor = current.clone();
        for axis in (0..self.dims.len()).rev() {
            successor[axis] += 1;
            if successor[axis] < self.dims[axis] {
                self.next = Some(successor);
                break;
            }
            successor[axis] = 0;
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for MultiIndexIter<'a> {}

impl<'a> FusedIterator for MultiIndexIter<'a> {}
