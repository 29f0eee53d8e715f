//! Quadrature sizing, reference scaling and tabulation of the elements of a monomial.
use crate::element::{CellShape, ElementTabulator, FiniteElement, LagrangeBasis, Tabulation};
use crate::error::Error;
use crate::monomial::Monomial;
use log::debug;
use ndarray::{Array2, ArrayView1, ArrayView2};
use reftensor_quadrature::{simplex, tensor, univariate, Rule};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A quadrature rule on a reference cell. Points are stored one per row.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    pub weights: Vec<f64>,
    pub points: Array2<f64>,
}

impl QuadratureRule {
    pub fn num_points(&self) -> usize {
        self.weights.len()
    }

    /// The dimension of the points of the rule.
    pub fn dimension(&self) -> usize {
        self.points.ncols()
    }

    pub fn points(&self) -> ArrayView2<f64> {
        self.points.view()
    }

    /// Approximates the integral of the given function using this quadrature rule.
    pub fn integrate(&self, f: impl Fn(ArrayView1<f64>) -> f64) -> f64 {
        self.weights
            .iter()
            .zip(self.points.rows())
            .map(|(w, p)| w * f(p))
            .sum()
    }
}

impl<const D: usize> From<Rule<D>> for QuadratureRule {
    fn from((weights, points): Rule<D>) -> Self {
        let num_points = points.len();
        let coords = points.into_iter().flatten().collect();
        let points =
            Array2::from_shape_vec((num_points, D), coords).expect("Internal error: Points have fixed dimension");
        Self { weights, points }
    }
}

/// Quadrature rule on the reference cell of the given shape.
///
/// `num_points_per_dim` points are used in every direction, so the rule integrates
/// polynomials of total degree `2 * num_points_per_dim - 1` exactly. The vertex rule is a
/// single point with unit weight.
pub fn reference_quadrature(shape: CellShape, num_points_per_dim: usize) -> Result<QuadratureRule, Error> {
    let m = num_points_per_dim;
    if m == 0 {
        return Err(reftensor_quadrature::Error::ZeroPoints.into());
    }
    let rule: QuadratureRule = match shape {
        CellShape::Vertex => simplex::vertex().into(),
        CellShape::Interval => univariate::gauss(m).into(),
        CellShape::Triangle => simplex::triangle_collapsed_gauss(m)?.into(),
        CellShape::Quadrilateral => tensor::quadrilateral_gauss(m)?.into(),
        CellShape::Tetrahedron => simplex::tetrahedron_collapsed_gauss(m)?.into(),
        CellShape::Hexahedron => tensor::hexahedron_gauss(m)?.into(),
    };
    Ok(rule)
}

/// Constants relating the biunit reference cells of the evaluator to the unit reference
/// cells the reference tensor is expressed on.
///
/// `value` compensates for the ratio of cell volumes and is applied once to the whole
/// tensor. `derivative` compensates for the ratio of edge lengths and is applied once per
/// derivative of a factor.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceScaling {
    pub value: f64,
    pub derivative: f64,
}

impl ReferenceScaling {
    pub fn for_shape(shape: CellShape) -> Self {
        let (value, derivative) = match shape {
            CellShape::Triangle => (0.25, 2.0),
            CellShape::Tetrahedron => (0.125, 2.0),
            _ => (1.0, 1.0),
        };
        Self { value, derivative }
    }

    /// Scaling for an integral of factors defined on `cell_shape`.
    ///
    /// Facet integrals take their value scale from the facets of the cell (edges of the
    /// unit triangle have length 1, faces of the unit tetrahedron area 1/2). The derivative
    /// scale always follows the cell.
    pub fn for_integral(cell_shape: CellShape, integral: Integral) -> Self {
        let cell = Self::for_shape(cell_shape);
        let value = match integral {
            Integral::Cell => cell.value,
            Integral::ExteriorFacet(_) => match cell_shape {
                CellShape::Triangle => 0.5,
                CellShape::Tetrahedron => 0.25,
                _ => 1.0,
            },
        };
        Self {
            value,
            derivative: cell.derivative,
        }
    }
}

/// Total polynomial degree of the integrand of a monomial.
///
/// Each factor contributes the degree of its element, reduced by the number of derivatives
/// applied to it. A negative total is clamped to zero.
pub fn compute_degree(monomial: &Monomial) -> usize {
    let degree: isize = monomial
        .basis_functions
        .iter()
        .map(|v| v.element.degree() as isize - v.derivative_order() as isize)
        .sum();
    degree.max(0) as usize
}

/// The number of points per dimension needed to integrate a polynomial of degree `q`.
pub fn num_points_per_dim(q: usize) -> usize {
    (q + 2) / 2
}

/// The domain of integration of a term.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Integral {
    /// Integral over the reference cell.
    #[default]
    Cell,
    /// Integral over the given facet of the reference cell.
    ExteriorFacet(usize),
}

impl Integral {
    /// The shape of the domain the quadrature rule is built on.
    pub fn integration_shape(&self, cell_shape: CellShape) -> Result<CellShape, Error> {
        match self {
            Self::Cell => Ok(cell_shape),
            Self::ExteriorFacet(_) => cell_shape.facet_shape(),
        }
    }

    /// Maps a rule on the integration shape to points on the reference cell.
    ///
    /// Facet rules are mapped with the linear Lagrange basis of the facet shape. Weights are
    /// kept as they are, the ratio of facet volumes is accounted for by the reference
    /// scaling.
    pub fn map_rule(&self, cell_shape: CellShape, rule: QuadratureRule) -> Result<QuadratureRule, Error> {
        let facet = match self {
            Self::Cell => return Ok(rule),
            Self::ExteriorFacet(facet) => *facet,
        };
        let facet_vertices = cell_shape.facet_vertices(facet)?;
        let facet_shape = cell_shape.facet_shape()?;
        let basis = LagrangeBasis::new(facet_shape, 1)?;

        // (facet vertices x points) and (cell vertices x cell dimension)
        let counts = vec![0; facet_shape.dimension()];
        let phi = basis.evaluate(&counts, rule.points());
        let cell_vertices = cell_shape.reference_vertices();
        let facet_coords = cell_vertices.select(ndarray::Axis(0), facet_vertices);
        let points = phi.t().dot(&facet_coords);

        Ok(QuadratureRule {
            weights: rule.weights,
            points,
        })
    }
}

/// Settings for the quadrature used to compute reference tensors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationSettings {
    /// Overrides the number of points per dimension that is otherwise derived from the
    /// polynomial degree of the integrand.
    pub num_points_per_dim: Option<usize>,
}

impl IntegrationSettings {
    pub fn with_num_points_per_dim(self, num_points_per_dim: usize) -> Self {
        Self {
            num_points_per_dim: Some(num_points_per_dim),
        }
    }
}

/// Checks that a monomial can be integrated and returns the cell shape of its factors.
///
/// This never touches the evaluator, so that malformed monomials are rejected before any
/// quadrature or tabulation is requested.
pub fn validate_monomial(monomial: &Monomial) -> Result<CellShape, Error> {
    let first = monomial.basis_functions.first().ok_or(Error::EmptyMonomial)?;
    let shape = first.element.shape();
    for v in &monomial.basis_functions {
        if v.component.len() > 1 {
            return Err(Error::UnsupportedRank {
                rank: v.component.len(),
            });
        }
        if v.element.value_rank() > 0 && v.component.is_empty() {
            return Err(Error::MissingComponent {
                value_rank: v.element.value_rank(),
            });
        }
        let derivative_shapes = v.derivatives.iter().map(|d| d.element.shape());
        if let Some(found) = std::iter::once(v.element.shape())
            .chain(derivative_shapes)
            .find(|&found| found != shape)
        {
            return Err(Error::MixedCellShapes { expected: shape, found });
        }
    }
    Ok(shape)
}

/// Everything needed to build the per-factor tables of a monomial.
#[derive(Debug, Clone)]
pub struct QuadratureTables {
    pub rule: QuadratureRule,
    pub scaling: ReferenceScaling,
    pub tables: FxHashMap<FiniteElement, Tabulation>,
}

/// Acquires a quadrature rule for a monomial and tabulates its elements at the points of
/// the rule.
pub fn init_quadrature<T>(
    monomial: &Monomial,
    integral: Integral,
    tabulator: &T,
    settings: &IntegrationSettings,
) -> Result<QuadratureTables, Error>
where
    T: ElementTabulator + ?Sized,
{
    let cell_shape = validate_monomial(monomial)?;
    let integration_shape = integral.integration_shape(cell_shape)?;
    if let Integral::ExteriorFacet(facet) = integral {
        cell_shape.facet_vertices(facet)?;
    }

    let q = compute_degree(monomial);
    let m = settings
        .num_points_per_dim
        .unwrap_or_else(|| num_points_per_dim(q));
    debug!(
        "Integrating degree {} on {} with {} point(s) per dimension",
        q, integration_shape, m
    );

    let rule = tabulator.quadrature(integration_shape, m)?;
    let rule = integral.map_rule(cell_shape, rule)?;
    let scaling = ReferenceScaling::for_integral(cell_shape, integral);
    let tables = init_tables(monomial, tabulator, rule.points())?;

    Ok(QuadratureTables { rule, scaling, tables })
}

/// Tabulates every distinct element of the monomial once, up to the highest derivative
/// order applied to any of its factors.
pub fn init_tables<T>(
    monomial: &Monomial,
    tabulator: &T,
    points: ArrayView2<f64>,
) -> Result<FxHashMap<FiniteElement, Tabulation>, Error>
where
    T: ElementTabulator + ?Sized,
{
    let mut orders: Vec<(&FiniteElement, usize)> = Vec::new();
    for v in &monomial.basis_functions {
        match orders.iter_mut().find(|(element, _)| *element == &v.element) {
            Some((_, order)) => *order = (*order).max(v.derivative_order()),
            None => orders.push((&v.element, v.derivative_order())),
        }
    }

    let mut tables = FxHashMap::default();
    for (element, max_order) in orders {
        debug!("Tabulating {} up to derivative order {}", element, max_order);
        let tabulation = tabulator.tabulate(element, max_order, points)?;
        tables.insert(element.clone(), tabulation);
    }
    Ok(tables)
}
