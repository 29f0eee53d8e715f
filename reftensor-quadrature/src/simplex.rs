//! Collapsed (Duffy) quadrature rules for the reference triangle and tetrahedron.
//!
//! The simplex is obtained from the cube `[-1, 1]^d` by collapsing coordinates. For the
//! triangle, the map
//! ```text
//!   x = (1 + a) (1 - b) / 2 - 1,    y = b
//! ```
//! has Jacobian determinant `(1 - b) / 2`, which is absorbed into a Gauss-Jacobi rule in `b`.
//! Since the collapsed integrand of a polynomial of total degree `q` has degree at most `q`
//! in each collapsed coordinate, `n` points per direction integrate total degree `2 n - 1`
//! exactly. The tetrahedron is handled the same way with one more collapsed direction.

use crate::univariate::{gauss, gauss_jacobi};
use crate::{Error, Rule};

/// Collapsed Gauss rule for the triangle with vertices `(-1, -1)`, `(1, -1)`, `(-1, 1)`.
///
/// The weights sum to the area of the triangle, which is `2`.
pub fn triangle_collapsed_gauss(num_points_per_dim: usize) -> Result<Rule<2>, Error> {
    let n = num_points_per_dim;
    if n == 0 {
        return Err(Error::ZeroPoints);
    }
    let (wa, pa) = gauss(n);
    let (wb, pb) = gauss_jacobi(n, 1.0);

    let mut weights = Vec::with_capacity(n * n);
    let mut points = Vec::with_capacity(n * n);
    for (&w_a, &[a]) in wa.iter().zip(&pa) {
        for (&w_b, &[b]) in wb.iter().zip(&pb) {
            let x = 0.5 * (1.0 + a) * (1.0 - b) - 1.0;
            weights.push(0.5 * w_a * w_b);
            points.push([x, b]);
        }
    }
    Ok((weights, points))
}

/// Collapsed Gauss rule for the tetrahedron with vertices `(-1, -1, -1)`, `(1, -1, -1)`,
/// `(-1, 1, -1)` and `(-1, -1, 1)`.
///
/// The weights sum to the volume of the tetrahedron, which is `4 / 3`.
pub fn tetrahedron_collapsed_gauss(num_points_per_dim: usize) -> Result<Rule<3>, Error> {
    let n = num_points_per_dim;
    if n == 0 {
        return Err(Error::ZeroPoints);
    }
    let (wa, pa) = gauss(n);
    let (wb, pb) = gauss_jacobi(n, 1.0);
    let (wc, pc) = gauss_jacobi(n, 2.0);

    let mut weights = Vec::with_capacity(n * n * n);
    let mut points = Vec::with_capacity(n * n * n);
    for (&w_a, &[a]) in wa.iter().zip(&pa) {
        for (&w_b, &[b]) in wb.iter().zip(&pb) {
            for (&w_c, &[c]) in wc.iter().zip(&pc) {
                let x = 0.25 * (1.0 + a) * (1.0 - b) * (1.0 - c) - 1.0;
                let y = 0.5 * (1.0 + b) * (1.0 - c) - 1.0;
                weights.push(0.125 * w_a * w_b * w_c);
                points.push([x, y, c]);
            }
        }
    }
    Ok((weights, points))
}

/// The trivial rule on a single point (the reference vertex), with unit weight.
pub fn vertex() -> Rule<0> {
    (vec![1.0], vec![[]])
}
