//! Contraction of the per-factor tables of a monomial into the reference tensor.
use crate::element::ElementTabulator;
use crate::error::Error;
use crate::index::{Index, IndexKind};
use crate::monomial::Monomial;
use crate::multi_index::MultiIndex;
use crate::psi::{compute_psi, Psi};
use crate::quadrature::{init_quadrature, Integral, IntegrationSettings};
use crate::reorder::Permutation;
use itertools::Itertools;
use log::{debug, trace};
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};

/// Computes the reference tensor of a monomial.
///
/// Returns the tensor values together with the index of each axis. Axes are ordered with
/// primary indices first and secondary indices second, each group by ascending slot.
pub fn integrate<T>(
    monomial: &Monomial,
    integral: Integral,
    tabulator: &T,
    settings: &IntegrationSettings,
) -> Result<(ArrayD<f64>, Vec<Index>), Error>
where
    T: ElementTabulator + ?Sized,
{
    let quadrature = init_quadrature(monomial, integral, tabulator, settings)?;
    let num_points = quadrature.rule.num_points();

    let psis = monomial
        .basis_functions
        .iter()
        .map(|v| compute_psi(v, &quadrature.tables, num_points, &quadrature.scaling))
        .collect::<Result<Vec<_>, _>>()?;

    let (a0, indices) = compute_product(
        &psis,
        &quadrature.rule.weights,
        quadrature.scaling.value * monomial.coefficient,
    )?;

    let rearrangement = Permutation::sorting_by_key(indices.len(), |&axis| {
        let index = &indices[axis];
        (index.kind() != IndexKind::Primary, index.slot())
    });
    let indices = rearrangement.apply_to_slice(&indices);
    let a0 = rearrangement.apply_to_axes(a0);
    debug!("Reference tensor has shape {:?}", a0.shape());

    Ok((a0, indices))
}

/// The shape and indices of the axes of the tables that survive into the reference
/// tensor, concatenated in factor order.
pub fn compute_shape(psis: &[Psi]) -> (Vec<usize>, Vec<Index>) {
    let dims = psis
        .iter()
        .flat_map(|psi| psi.free_dims().iter().copied())
        .collect();
    let indices = psis
        .iter()
        .flat_map(|psi| psi.free_indices().iter().cloned())
        .collect();
    (dims, indices)
}

/// The dimension of every auxiliary reference index, ordered by slot.
pub fn compute_auxiliary_shape(psis: &[Psi]) -> Result<Vec<usize>, Error> {
    let num_slots = psis
        .iter()
        .flat_map(|psi| psi.bpart.iter())
        .max()
        .map_or(0, |&slot| slot + 1);

    let mut dims: Vec<Option<usize>> = vec![None; num_slots];
    for psi in psis {
        for (&slot, &dim) in psi.bpart.iter().zip(psi.auxiliary_dims()) {
            match dims[slot] {
                None => dims[slot] = Some(dim),
                Some(first) if first != dim => {
                    return Err(Error::InconsistentAuxiliaryDimension {
                        slot,
                        first,
                        second: dim,
                    })
                }
                Some(_) => {}
            }
        }
    }

    dims.into_iter()
        .enumerate()
        .map(|(slot, dim)| dim.ok_or(Error::UnresolvedAuxiliaryDimension { slot }))
        .collect()
}

/// The outer product of two arrays, with the axes of `a` followed by the axes of `b`.
fn outer_product(a: &ArrayD<f64>, b: ArrayViewD<f64>) -> ArrayD<f64> {
    let shape: Vec<usize> = a.shape().iter().chain(b.shape()).copied().collect();
    let data = a
        .iter()
        .cartesian_product(b.iter())
        .map(|(x, y)| x * y)
        .collect();
    ArrayD::from_shape_vec(IxDyn(&shape), data).expect("Internal error: Outer product shape matches data")
}

/// Sums the weighted outer products of the tables over all points and all values of the
/// auxiliary reference indices, and scales the result by `scale`.
///
/// The axes of the result are the free axes of the tables in factor order.
pub fn compute_product(psis: &[Psi], weights: &[f64], scale: f64) -> Result<(ArrayD<f64>, Vec<Index>), Error> {
    let (shape, indices) = compute_shape(psis);
    let auxiliary = MultiIndex::new(compute_auxiliary_shape(psis)?);
    debug!(
        "Computing product of {} table(s) with free shape {:?} and auxiliary shape {:?}",
        psis.len(),
        shape,
        auxiliary.dims()
    );

    let mut a0 = ArrayD::zeros(IxDyn(&shape));
    for (q, &weight) in weights.iter().enumerate() {
        trace!("Accumulating point {} of {}", q + 1, weights.len());
        for b in &auxiliary {
            let mut product = ArrayD::from_elem(IxDyn(&[]), 1.0);
            for psi in psis {
                let mut slice = psi.values.index_axis(Axis(0), q);
                for &slot in &psi.bpart {
                    slice = slice.index_axis_move(Axis(0), b[slot]);
                }
                product = outer_product(&product, slice);
            }
            a0.scaled_add(weight, &product);
        }
    }
    a0 *= scale;

    Ok((a0, indices))
}
