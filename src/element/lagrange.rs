//! Nodal Lagrange bases of arbitrary degree on the reference cells.
use crate::element::{CellShape, ElementTabulator, FiniteElement, Tabulation};
use crate::error::Error;
use crate::multi_index::MultiIndex;
use crate::quadrature::{reference_quadrature, QuadratureRule};
use log::trace;
use nalgebra::DMatrix;
use ndarray::{s, Array2, ArrayView1, ArrayView2};

/// The nodal basis of a scalar Lagrange element.
///
/// Basis functions are expressed in the monomial basis of the polynomial space (total
/// degree for simplices, per-direction degree for boxes) and are determined by inverting the
/// Vandermonde matrix at the nodes. Nodes are the reference vertices followed by the
/// remaining points of the equispaced lattice in lexicographic order. The only node of
/// a degree zero basis is the centroid of the cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LagrangeBasis {
    shape: CellShape,
    degree: usize,
    exponents: Vec<Vec<usize>>,
    nodes: Array2<f64>,
    /// Column `i` holds the monomial coefficients of basis function `i`.
    coefficients: DMatrix<f64>,
}

/// Exponent tuples of the monomials spanning the polynomial space.
fn monomial_exponents(shape: CellShape, degree: usize) -> Vec<Vec<usize>> {
    let multi_index = MultiIndex::new(vec![degree + 1; shape.dimension()]);
    multi_index
        .iter()
        .filter(|exponents| !shape.is_simplex() || exponents.iter().sum::<usize>() <= degree)
        .collect()
}

fn lattice_nodes(shape: CellShape, degree: usize) -> Array2<f64> {
    let dim = shape.dimension();
    if degree == 0 {
        let vertices = shape.reference_vertices();
        let centroid = vertices
            .mean_axis(ndarray::Axis(0))
            .unwrap_or_else(|| ndarray::Array1::zeros(dim));
        return centroid.into_shape((1, dim)).expect("Internal error: Centroid has cell dimension");
    }

    let vertices = shape.reference_vertices();
    let to_lattice = |x: f64| ((x + 1.0) * degree as f64 / 2.0).round() as usize;
    let vertex_coords: Vec<Vec<usize>> = vertices
        .rows()
        .into_iter()
        .map(|v| v.iter().map(|&x| to_lattice(x)).collect())
        .collect();

    let interior = monomial_exponents(shape, degree)
        .into_iter()
        .filter(|alpha| !vertex_coords.contains(alpha));
    let h = 2.0 / degree as f64;
    let coords: Vec<f64> = vertex_coords
        .iter()
        .cloned()
        .chain(interior)
        .flat_map(|alpha| alpha.into_iter().map(move |a| -1.0 + h * a as f64))
        .collect();
    let num_nodes = coords.len().checked_div(dim).unwrap_or(1);
    Array2::from_shape_vec((num_nodes, dim), coords).expect("Internal error: Lattice nodes have cell dimension")
}

/// Derivative of the monomial `x^exponents` with `counts[k]` derivatives in direction `k`.
fn monomial_derivative(exponents: &[usize], counts: &[usize], point: ArrayView1<f64>) -> f64 {
    exponents
        .iter()
        .zip(counts)
        .zip(point)
        .map(|((&e, &c), &x)| {
            if c > e {
                0.0
            } else {
                let falling: usize = (e - c + 1..=e).product();
                falling as f64 * x.powi((e - c) as i32)
            }
        })
        .product()
}

impl LagrangeBasis {
    pub fn new(shape: CellShape, degree: usize) -> Result<Self, Error> {
        let exponents = monomial_exponents(shape, degree);
        let nodes = lattice_nodes(shape, degree);
        let n = exponents.len();
        debug_assert_eq!(nodes.nrows(), n);

        let zero_counts = vec![0; shape.dimension()];
        let vandermonde = DMatrix::from_fn(n, n, |i, j| monomial_derivative(&exponents[j], &zero_counts, nodes.row(i)));
        let coefficients = vandermonde
            .try_inverse()
            .ok_or_else(|| Error::SingularBasis {
                element: format!("Lagrange({}, {})", shape, degree),
            })?;

        Ok(Self {
            shape,
            degree,
            exponents,
            nodes,
            coefficients,
        })
    }

    pub fn shape(&self) -> CellShape {
        self.shape
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn num_basis_functions(&self) -> usize {
        self.exponents.len()
    }

    /// The nodes of the basis, one per row. Basis function `i` is one at node `i` and zero
    /// at all other nodes.
    pub fn nodes(&self) -> ArrayView2<f64> {
        self.nodes.view()
    }

    /// Evaluates derivatives of all basis functions at the given points.
    ///
    /// `counts[k]` is the number of derivatives taken in reference direction `k`. The result
    /// has one row per basis function and one column per point.
    pub fn evaluate(&self, counts: &[usize], points: ArrayView2<f64>) -> Array2<f64> {
        assert_eq!(counts.len(), self.shape.dimension(), "Derivative counts must match cell dimension");
        assert_eq!(points.ncols(), self.shape.dimension(), "Points must match cell dimension");

        let n = self.num_basis_functions();
        let mut values = Array2::zeros((n, points.nrows()));
        for (q, point) in points.rows().into_iter().enumerate() {
            let monomials: Vec<f64> = self
                .exponents
                .iter()
                .map(|exponents| monomial_derivative(exponents, counts, point))
                .collect();
            for i in 0..n {
                values[[i, q]] = self
                    .coefficients
                    .column(i)
                    .iter()
                    .zip(&monomials)
                    .map(|(c, m)| c * m)
                    .sum();
            }
        }
        values
    }
}

/// All per-direction derivative count tuples of the given total order.
fn derivative_count_tuples(dim: usize, order: usize) -> Vec<Vec<usize>> {
    MultiIndex::new(vec![order + 1; dim])
        .iter()
        .filter(|counts| counts.iter().sum::<usize>() == order)
        .collect()
}

/// Element evaluator for (discontinuous) Lagrange elements on the biunit reference cells.
///
/// Vector-valued elements are tabulated component by component: the basis functions of
/// component `c` occupy the `c`-th block of the scalar basis, and are zero in every
/// other component.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LagrangeTabulator;

impl ElementTabulator for LagrangeTabulator {
    fn quadrature(&self, shape: CellShape, num_points_per_dim: usize) -> Result<QuadratureRule, Error> {
        reference_quadrature(shape, num_points_per_dim)
    }

    fn tabulate(
        &self,
        element: &FiniteElement,
        max_order: usize,
        points: ArrayView2<f64>,
    ) -> Result<Tabulation, Error> {
        let basis = LagrangeBasis::new(element.shape(), element.degree())?;
        let num_components = element.num_components();
        let n = basis.num_basis_functions();

        let mut tabulation = Tabulation::new(num_components);
        for order in 0..=max_order {
            for counts in derivative_count_tuples(element.cell_dimension(), order) {
                trace!("Tabulating {} with derivative counts {:?}", element, counts);
                let scalar = basis.evaluate(&counts, points);
                if element.value_rank() == 0 {
                    tabulation.insert(0, counts, scalar);
                    continue;
                }
                for component in 0..num_components {
                    let mut values = Array2::zeros((n * num_components, points.nrows()));
                    values
                        .slice_mut(s![component * n..(component + 1) * n, ..])
                        .assign(&scalar);
                    tabulation.insert(component, counts.clone(), values);
                }
            }
        }
        Ok(tabulation)
    }
}
