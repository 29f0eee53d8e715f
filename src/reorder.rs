use core::fmt;
use ndarray::{ArrayD, IxDyn};
use std::error::Error;
use std::marker::PhantomData;

/// A representation of an axis permutation.
///
/// More precisely, given `n` axes, the permutation internally stores a permutation array
/// `perm` such that for *target axis* `i` in `0 .. n`, the corresponding *source axis* is
/// given by
///
/// ```ignore
/// target[i] = source[perm[i]]
/// ```
///
/// This is the same convention as [`ndarray::ArrayBase::permuted_axes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    perm: Vec<usize>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InvalidPermutation {
    marker: PhantomData<()>,
}

impl fmt::Display for InvalidPermutation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid permutation")
    }
}

impl Error for InvalidPermutation {}

impl Permutation {
    pub fn from_vec(perm: Vec<usize>) -> Result<Self, InvalidPermutation> {
        let mut visited = vec![false; perm.len()];
        for &index in &perm {
            if index >= perm.len() || visited[index] {
                return Err(InvalidPermutation { marker: PhantomData });
            } else {
                visited[index] = true;
            }
        }
        Ok(Self { perm })
    }

    pub fn identity(n: usize) -> Self {
        Self { perm: (0..n).collect() }
    }

    /// The permutation that sorts `n` items by the given key.
    ///
    /// The sort is stable: items with equal keys keep their relative order.
    pub fn sorting_by_key<K: Ord>(n: usize, key: impl FnMut(&usize) -> K) -> Self {
        let mut perm: Vec<usize> = (0..n).collect();
        perm.sort_by_key(key);
        Self { perm }
    }

    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    pub fn is_identity(&self) -> bool {
        self.perm.iter().enumerate().all(|(i, &j)| i == j)
    }

    pub fn apply_to_slice<T: Clone>(&self, slice: &[T]) -> Vec<T> {
        assert_eq!(slice.len(), self.len(), "Slice and permutation must have the same size.");
        self.perm()
            .iter()
            .map(|source_idx| slice[*source_idx].clone())
            .collect()
    }

    /// Permutes the axes of an array.
    ///
    /// The result is laid out in standard order, so that later iteration over the array
    /// visits elements in the permuted order.
    pub fn apply_to_axes(&self, array: ArrayD<f64>) -> ArrayD<f64> {
        assert_eq!(array.ndim(), self.len(), "Array rank and permutation must have the same size.");
        if self.is_identity() {
            return array;
        }
        array
            .permuted_axes(IxDyn(self.perm()))
            .as_standard_layout()
            .into_owned()
    }
}
