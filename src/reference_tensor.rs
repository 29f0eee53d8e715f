use crate::element::ElementTabulator;
use crate::error::Error;
use crate::index::{Index, IndexKind, IndexValues};
use crate::integrate::integrate;
use crate::monomial::Monomial;
use crate::multi_index::MultiIndex;
use crate::quadrature::{Integral, IntegrationSettings};
use log::debug;
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use serde::{Deserialize, Serialize};

/// The reference tensor `A0` of a monomial.
///
/// The axes of `A0` are labeled by the primary indices of the monomial, followed by its
/// secondary indices, each group in ascending slot order. An index that labels several
/// factors contributes one axis per occurrence.
///
/// The multi indices describe the ranges of the primary (`i`), secondary (`a`) and
/// auxiliary reference (`b`) indices, one entry per slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceTensor {
    a0: ArrayD<f64>,
    indices: Vec<Index>,
    primary: MultiIndex,
    secondary: MultiIndex,
    auxiliary: MultiIndex,
}

/// All indices of a monomial together with the dimension of the axis they label.
fn declared_indices(monomial: &Monomial) -> impl Iterator<Item = (&Index, usize)> {
    monomial.basis_functions.iter().flat_map(|v| {
        let element = &v.element;
        let basis = std::iter::once((&v.index, element.space_dimension()));
        let components = v
            .component
            .iter()
            .enumerate()
            .map(move |(i, index)| (index, element.value_dimension(i)));
        let derivatives = v
            .derivatives
            .iter()
            .map(|derivative| (&derivative.index, derivative.element.cell_dimension()));
        basis.chain(components).chain(derivatives)
    })
}

/// Finds the dimension of the index with the given kind and slot from the first factor
/// that declares it.
pub fn find_dim(monomial: &Monomial, kind: IndexKind, slot: usize) -> Result<usize, Error> {
    declared_indices(monomial)
        .find(|(index, _)| index.key() == (kind, slot))
        .map(|(_, dim)| dim)
        .ok_or(Error::UnresolvedIndexDimension { kind, slot })
}

/// Builds the multi index over all slots `0 ..= max slot` of the given kind.
pub fn create_multi_index(monomial: &Monomial, kind: IndexKind) -> Result<MultiIndex, Error> {
    let num_slots = declared_indices(monomial)
        .filter(|(index, _)| index.kind() == kind)
        .map(|(index, _)| index.slot() + 1)
        .max()
        .unwrap_or(0);
    let dims = (0..num_slots)
        .map(|slot| find_dim(monomial, kind, slot))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MultiIndex::new(dims))
}

impl ReferenceTensor {
    /// Computes the reference tensor of a monomial integrated over the given domain.
    pub fn new<T>(
        monomial: &Monomial,
        integral: Integral,
        tabulator: &T,
        settings: &IntegrationSettings,
    ) -> Result<Self, Error>
    where
        T: ElementTabulator + ?Sized,
    {
        let (a0, indices) = integrate(monomial, integral, tabulator, settings)?;

        let primary = create_multi_index(monomial, IndexKind::Primary)?;
        let secondary = create_multi_index(monomial, IndexKind::Secondary)?;
        let auxiliary = create_multi_index(monomial, IndexKind::AuxiliaryReference)?;
        debug!("Primary multi index: {}", primary);
        debug!("Secondary multi index: {}", secondary);
        debug!("Auxiliary multi index: {}", auxiliary);

        Ok(Self {
            a0,
            indices,
            primary,
            secondary,
            auxiliary,
        })
    }

    pub fn values(&self) -> ArrayViewD<f64> {
        self.a0.view()
    }

    /// The index labeling each axis of the tensor.
    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    pub fn primary(&self) -> &MultiIndex {
        &self.primary
    }

    pub fn secondary(&self) -> &MultiIndex {
        &self.secondary
    }

    pub fn auxiliary(&self) -> &MultiIndex {
        &self.auxiliary
    }

    /// The entry for the given values of the primary and secondary indices.
    ///
    /// `i` and `a` hold one value per slot, as enumerated by [`primary`](Self::primary) and
    /// [`secondary`](Self::secondary).
    pub fn value_at(&self, i: &[usize], a: &[usize]) -> Result<f64, Error> {
        let values = IndexValues::new().with_primary(i).with_secondary(a);
        let coords = self
            .indices
            .iter()
            .map(|index| index.evaluate(&values))
            .collect::<Result<Vec<_>, _>>()?;
        for (&value, &dimension) in coords.iter().zip(self.a0.shape()) {
            if value >= dimension {
                return Err(Error::IndexOutOfBounds { value, dimension });
            }
        }
        Ok(self.a0[IxDyn(&coords)])
    }
}
