//! 2D and 3D quadrature rules formed by tensor product formulations.
//!
//! For quadrilaterals and hexahedra, quadrature rules can be constructed as tensor products
//! of 1D Gauss rules. The last coordinate varies fastest.

use crate::univariate::gauss;
use crate::{Error, Point, Rule};

/// Forms the `D`-fold tensor product of a 1D rule.
fn tensor_product<const D: usize>(rule1d: &Rule<1>) -> Rule<D> {
    let (weights1d, points1d) = rule1d;
    let n = weights1d.len();
    let total = n.pow(D as u32);
    let mut weights = Vec::with_capacity(total);
    let mut points = Vec::with_capacity(total);

    for linear in 0..total {
        let mut remainder = linear;
        let mut point: Point<D> = [0.0; D];
        let mut w = 1.0;
        for d in (0..D).rev() {
            let i = remainder % n;
            remainder /= n;
            point[d] = points1d[i][0];
            w *= weights1d[i];
        }
        weights.push(w);
        points.push(point);
    }

    (weights, points)
}

/// A Gauss quadrature rule for the reference quadrilateral `[-1, 1]^2`.
///
/// The rule is constructed as a tensor product from 1D rules, with the provided number of
/// points per dimension.
pub fn quadrilateral_gauss(num_points_per_dim: usize) -> Result<Rule<2>, Error> {
    if num_points_per_dim == 0 {
        return Err(Error::ZeroPoints);
    }
    Ok(tensor_product(&gauss(num_points_per_dim)))
}

/// A Gauss quadrature rule for the reference hexahedron `[-1, 1]^3`.
///
/// The rule is constructed as a tensor product from 1D rules, with the provided number of
/// points per dimension.
pub fn hexahedron_gauss(num_points_per_dim: usize) -> Result<Rule<3>, Error> {
    if num_points_per_dim == 0 {
        return Err(Error::ZeroPoints);
    }
    Ok(tensor_product(&gauss(num_points_per_dim)))
}
