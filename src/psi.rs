//! Per-factor tables of basis function values at quadrature points.
//!
//! For every factor of a monomial, the tabulated values of the (differentiated) basis
//! functions are gathered into a dense array with one axis per index of the factor. The
//! array is then brought into a canonical layout:
//!
//! ```text
//!   [points, auxiliary reference axes..., primary axes..., secondary axes...]
//! ```
//!
//! where fixed indices have been contracted away by selecting their value, and axes of the
//! same kind are ordered by slot.
use crate::element::{FiniteElement, Tabulation};
use crate::error::Error;
use crate::index::{Index, IndexKind};
use crate::monomial::BasisFunction;
use crate::multi_index::MultiIndex;
use crate::quadrature::ReferenceScaling;
use crate::reorder::Permutation;
use log::debug;
use ndarray::{ArrayD, Axis, IxDyn};
use rustc_hash::FxHashMap;

/// The table of a single factor.
#[derive(Debug, Clone)]
pub struct Psi {
    /// Values with the point axis first.
    pub values: ArrayD<f64>,
    /// The indices of all axes but the first, in axis order.
    pub indices: Vec<Index>,
    /// Slots of the auxiliary reference indices. These label the axes directly following
    /// the point axis.
    pub bpart: Vec<usize>,
}

impl Psi {
    pub fn num_points(&self) -> usize {
        self.values.len_of(Axis(0))
    }

    /// The indices of the axes that survive into the reference tensor.
    pub fn free_indices(&self) -> &[Index] {
        &self.indices[self.bpart.len()..]
    }

    /// The dimensions of the axes that survive into the reference tensor.
    pub fn free_dims(&self) -> &[usize] {
        &self.values.shape()[1 + self.bpart.len()..]
    }

    /// The dimensions of the auxiliary reference axes, in the order of `bpart`.
    pub fn auxiliary_dims(&self) -> &[usize] {
        &self.values.shape()[1..1 + self.bpart.len()]
    }
}

/// Translates a list of derivative directions into the number of derivatives taken in each
/// of the `dim` reference directions.
///
/// # Panics
///
/// Panics if a direction is not smaller than `dim`.
pub fn derivative_counts(directions: &[usize], dim: usize) -> Vec<usize> {
    let mut counts = vec![0; dim];
    for &direction in directions {
        counts[direction] += 1;
    }
    counts
}

fn kind_rank(index: &Index) -> Result<usize, Error> {
    match index.kind() {
        IndexKind::Fixed => Ok(0),
        IndexKind::AuxiliaryReference => Ok(1),
        IndexKind::Primary => Ok(2),
        IndexKind::Secondary => Ok(3),
        IndexKind::Auxiliary
        | IndexKind::AuxiliaryGeometry
        | IndexKind::Function
        | IndexKind::Projection
        | IndexKind::Constant => Err(Error::UnexpectedIndexKind {
            kind: index.kind(),
            slot: index.slot(),
        }),
    }
}

/// The axis permutation that brings the given indices into canonical order.
///
/// Fixed indices come first, followed by auxiliary reference, primary and secondary
/// indices. Ties are broken by slot, and the sort is stable.
pub fn compute_rearrangement(indices: &[Index]) -> Result<Permutation, Error> {
    let keys = indices
        .iter()
        .map(|index| Ok((kind_rank(index)?, index.slot())))
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(Permutation::sorting_by_key(indices.len(), |&axis| keys[axis]))
}

/// Gathers the tabulated values of a factor into an array with the axes
/// `[component?, derivatives..., basis, points]`.
fn gather_values(
    v: &BasisFunction,
    tabulation: &Tabulation,
    num_points: usize,
) -> Result<(ArrayD<f64>, Vec<Index>), Error> {
    let element = &v.element;
    let cell_dim = element.cell_dimension();

    let mut indices = Vec::new();
    let mut head_dims = Vec::new();
    match v.component.as_slice() {
        [] if element.value_rank() > 0 => {
            return Err(Error::MissingComponent {
                value_rank: element.value_rank(),
            })
        }
        [] => {}
        [component] => {
            indices.push(component.clone());
            head_dims.push(element.value_dimension(0));
        }
        components => {
            return Err(Error::UnsupportedRank {
                rank: components.len(),
            })
        }
    }
    for derivative in &v.derivatives {
        indices.push(derivative.index.clone());
        head_dims.push(derivative.element.cell_dimension());
    }
    indices.push(v.index.clone());

    let num_derivatives = v.derivatives.len();
    let has_component = !v.component.is_empty();
    let mut shape = head_dims.clone();
    shape.push(element.space_dimension());
    shape.push(num_points);
    let expected = (element.space_dimension(), num_points);
    let mut values = ArrayD::zeros(IxDyn(&shape));

    for head in &MultiIndex::new(head_dims) {
        let (component, directions) = if has_component {
            (head[0], &head[1..])
        } else {
            (0, &head[..])
        };
        debug_assert_eq!(directions.len(), num_derivatives);
        let counts = derivative_counts(directions, cell_dim);
        let table = tabulation
            .get(component, &counts)
            .ok_or_else(|| missing_tabulation(element, component, &counts))?;
        if table.dim() != expected {
            return Err(Error::InvalidTabulation {
                element: element.to_string(),
                expected,
                found: table.dim(),
            });
        }

        let mut block = values.view_mut();
        for &i in &head {
            block = block.index_axis_move(Axis(0), i);
        }
        block.assign(table);
    }

    Ok((values, indices))
}

fn missing_tabulation(element: &FiniteElement, component: usize, counts: &[usize]) -> Error {
    Error::MissingTabulation {
        element: element.to_string(),
        component,
        counts: counts.to_vec(),
    }
}

/// Builds the table of a single factor of a monomial.
///
/// The values are scaled by `scaling.derivative` to the power of the derivative order of
/// the factor.
pub fn compute_psi(
    v: &BasisFunction,
    tables: &FxHashMap<FiniteElement, Tabulation>,
    num_points: usize,
    scaling: &ReferenceScaling,
) -> Result<Psi, Error> {
    debug!("Computing table for {}", v);
    let tabulation = tables.get(&v.element).ok_or_else(|| Error::UntabulatedElement {
        element: v.element.to_string(),
    })?;
    let (values, indices) = gather_values(v, tabulation, num_points)?;

    // Canonical axis order, with the point axis moved to the front
    let rearrangement = compute_rearrangement(&indices)?;
    let point_axis = indices.len();
    let perm: Vec<usize> = std::iter::once(point_axis)
        .chain(rearrangement.perm().iter().copied())
        .collect();
    let perm = Permutation::from_vec(perm).expect("Internal error: Axis permutation must be valid");
    let mut indices = rearrangement.apply_to_slice(&indices);
    let mut values = perm.apply_to_axes(values);

    // Contract fixed axes, which directly follow the point axis
    let num_fixed = indices.iter().take_while(|index| index.is_fixed()).count();
    for index in indices.drain(..num_fixed) {
        let dimension = values.len_of(Axis(1));
        if index.slot() >= dimension {
            return Err(Error::IndexOutOfBounds {
                value: index.slot(),
                dimension,
            });
        }
        values = values.index_axis_move(Axis(1), index.slot());
    }

    let order = v.derivative_order() as i32;
    if order > 0 {
        values *= scaling.derivative.powi(order);
    }

    let bpart: Vec<usize> = indices
        .iter()
        .take_while(|index| index.kind() == IndexKind::AuxiliaryReference)
        .map(Index::slot)
        .collect();
    debug!("Table for {} has shape {:?} and auxiliary slots {:?}", v, values.shape(), bpart);

    Ok(Psi { values, indices, bpart })
}
