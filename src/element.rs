//! Finite element handles and the element evaluator interface.
//!
//! The reference tensor computation never evaluates basis functions itself. It asks an
//! [`ElementTabulator`] for quadrature rules and for tables of basis function values and
//! derivatives at those points. [`LagrangeTabulator`] is the evaluator shipped with
//! the crate.
use crate::error::Error;
use crate::quadrature::QuadratureRule;
use ndarray::{Array2, ArrayView2};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

mod cell;
pub mod lagrange;

pub use cell::CellShape;
pub use lagrange::{LagrangeBasis, LagrangeTabulator};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementFamily {
    Lagrange,
    DiscontinuousLagrange,
}

/// A handle describing a finite element.
///
/// Two handles that compare equal describe the same element, which is what the quadrature
/// orchestration relies on when it tabulates each distinct element only once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FiniteElement {
    family: ElementFamily,
    shape: CellShape,
    degree: usize,
    value_shape: Vec<usize>,
}

impl FiniteElement {
    pub fn new(family: ElementFamily, shape: CellShape, degree: usize) -> Self {
        Self {
            family,
            shape,
            degree,
            value_shape: Vec::new(),
        }
    }

    /// Scalar continuous Lagrange element.
    pub fn lagrange(shape: CellShape, degree: usize) -> Self {
        Self::new(ElementFamily::Lagrange, shape, degree)
    }

    /// Scalar discontinuous Lagrange element. Admits degree zero.
    pub fn discontinuous_lagrange(shape: CellShape, degree: usize) -> Self {
        Self::new(ElementFamily::DiscontinuousLagrange, shape, degree)
    }

    /// Vector-valued Lagrange element with one component per cell dimension.
    pub fn vector_lagrange(shape: CellShape, degree: usize) -> Self {
        Self::lagrange(shape, degree).with_value_shape(vec![shape.dimension()])
    }

    pub fn with_value_shape(self, value_shape: Vec<usize>) -> Self {
        Self { value_shape, ..self }
    }

    pub fn family(&self) -> ElementFamily {
        self.family
    }

    pub fn shape(&self) -> CellShape {
        self.shape
    }

    /// Polynomial degree of the basis functions.
    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn value_shape(&self) -> &[usize] {
        &self.value_shape
    }

    pub fn value_rank(&self) -> usize {
        self.value_shape.len()
    }

    /// Number of values along the `i`-th value axis. Scalar elements have a single value.
    pub fn value_dimension(&self, i: usize) -> usize {
        self.value_shape.get(i).copied().unwrap_or(1)
    }

    /// Total number of scalar components of the element.
    pub fn num_components(&self) -> usize {
        self.value_shape.iter().product()
    }

    /// Topological dimension of the reference cell.
    pub fn cell_dimension(&self) -> usize {
        self.shape.dimension()
    }

    /// Number of basis functions of a single component.
    pub fn scalar_space_dimension(&self) -> usize {
        let k = self.degree;
        let d = self.cell_dimension();
        if self.shape.is_simplex() {
            num::integer::binomial(k + d, d)
        } else {
            (k + 1).pow(d as u32)
        }
    }

    /// Number of basis functions of the element.
    pub fn space_dimension(&self) -> usize {
        self.scalar_space_dimension() * self.num_components()
    }
}

impl Display for FiniteElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({}, {})", self.family, self.shape, self.degree)?;
        if !self.value_shape.is_empty() {
            write!(f, "^{:?}", self.value_shape)?;
        }
        Ok(())
    }
}

/// Basis function values and derivatives of an element at a set of points.
///
/// Entries are keyed by component, derivative order and the number of derivatives taken in
/// each reference direction (e.g. `[2, 0]` for the second derivative in the first
/// direction of a 2D cell). Each entry holds one row per basis function and one column per
/// point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tabulation {
    components: Vec<Vec<FxHashMap<Vec<usize>, Array2<f64>>>>,
}

impl Tabulation {
    pub fn new(num_components: usize) -> Self {
        Self {
            components: vec![Vec::new(); num_components],
        }
    }

    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    /// The highest derivative order present in the table.
    pub fn max_order(&self) -> Option<usize> {
        self.components
            .iter()
            .filter_map(|orders| orders.len().checked_sub(1))
            .max()
    }

    /// Stores values for the given component and derivative counts.
    ///
    /// # Panics
    ///
    /// Panics if the component is out of bounds.
    pub fn insert(&mut self, component: usize, counts: Vec<usize>, values: Array2<f64>) {
        let order: usize = counts.iter().sum();
        let orders = &mut self.components[component];
        if orders.len() <= order {
            orders.resize_with(order + 1, FxHashMap::default);
        }
        orders[order].insert(counts, values);
    }

    pub fn get(&self, component: usize, counts: &[usize]) -> Option<&Array2<f64>> {
        let order: usize = counts.iter().sum();
        self.components.get(component)?.get(order)?.get(counts)
    }
}

/// The element evaluator.
///
/// Implementations provide quadrature rules on reference cells and tabulate basis functions
/// on those cells. All results must be expressed on the same reference cells, since the
/// scaling constants applied to the reference tensor assume the biunit convention
/// described in [`CellShape`].
pub trait ElementTabulator {
    /// A quadrature rule on the reference cell with the given number of points per dimension.
    fn quadrature(&self, shape: CellShape, num_points_per_dim: usize) -> Result<QuadratureRule, Error>;

    /// Tabulates all basis functions of the element and all of their derivatives up to and
    /// including `max_order` at the given points (one point per row).
    fn tabulate(&self, element: &FiniteElement, max_order: usize, points: ArrayView2<f64>)
        -> Result<Tabulation, Error>;
}

impl<X> ElementTabulator for &X
where
    X: ElementTabulator + ?Sized,
{
    fn quadrature(&self, shape: CellShape, num_points_per_dim: usize) -> Result<QuadratureRule, Error> {
        X::quadrature(self, shape, num_points_per_dim)
    }

    fn tabulate(
        &self,
        element: &FiniteElement,
        max_order: usize,
        points: ArrayView2<f64>,
    ) -> Result<Tabulation, Error> {
        X::tabulate(self, element, max_order, points)
    }
}
