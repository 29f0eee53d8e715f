//! Quadrature rules for the biunit reference cells.
//!
//! All rules in this crate are defined on the reference cells used by `reftensor`:
//!
//! - the interval `[-1, 1]`,
//! - the quadrilateral `[-1, 1]^2` and hexahedron `[-1, 1]^3`,
//! - the triangle with vertices `(-1, -1)`, `(1, -1)`, `(-1, 1)`,
//! - the tetrahedron with vertices `(-1, -1, -1)`, `(1, -1, -1)`, `(-1, 1, -1)`, `(-1, -1, 1)`.
//!
//! Rules are parametrized by the number of points *per dimension*. A rule with `n` points
//! per dimension integrates polynomials of total degree up to `2 n - 1` exactly on every cell.

use std::fmt;
use std::fmt::{Display, Formatter};

pub mod simplex;
pub mod tensor;
pub mod univariate;

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A rule with zero points per dimension was requested.
    ZeroPoints,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPoints => write!(f, "A quadrature rule needs at least one point per dimension"),
        }
    }
}

impl std::error::Error for Error {}

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A D-dimensional rule.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// Approximates the integral of `f` with the given rule.
pub fn integrate<const D: usize>(rule: &Rule<D>, f: impl Fn(&Point<D>) -> f64) -> f64 {
    let (weights, points) = rule;
    weights.iter().zip(points).map(|(w, p)| w * f(p)).sum()
}
