//! Quadrature rules for the one-dimensional domain `[-1, 1]`.

use crate::Rule;
use nalgebra::{DMatrix, SymmetricEigen};
use std::f64::consts::PI;

/// Recurrence relation for Legendre polynomials.
///
/// Note: we use a formula for which derivatives are *not* defined at |x| == 1, so it is only
/// suitable for evaluation in the open interval (-1, 1).
#[derive(Debug, Default)]
struct LegendreRecurrence {
    n: usize,
    x: f64,
    // p_n(x)
    p1: f64,
    // p_{n - 1}(x)
    p2: f64,
}

impl LegendreRecurrence {
    pub fn evaluate(n: usize, x: f64) -> Self {
        //  m P_m(x) = (2m - 1) * x P_{m - 1}(x) - (m - 1) P_{m - 2}(x)
        let mut p1 = 1.0;
        let mut p2 = 0.0;
        for m in 1..=n {
            let m = m as f64;
            let p3 = p2;
            p2 = p1;
            p1 = ((2.0 * m - 1.0) * x * p2 - (m - 1.0) * p3) / m;
        }

        Self { n, x, p1, p2 }
    }

    fn value(&self) -> f64 {
        self.p1
    }

    fn derivative(&self) -> f64 {
        let Self { n, x, p1, p2 } = &self;
        let n = *n as f64;
        // dp_n/dx (x) = n * (x * p_n(x) - p_{n - 1}(x)) / (x^2 - 1)
        n * (x * p1 - p2) / (x * x - 1.0)
    }
}

/// Gauss quadrature for the reference interval [-1, 1].
///
/// Returns the [Gauss quadrature rule] with the given number of points. Given `n` points,
/// the rule integrates polynomials of order up to `2 n - 1` exactly. Points are returned
/// in ascending order.
///
/// # Panics
///
/// Panics if zero points are requested.
///
/// [Gauss quadrature rule]: https://en.wikipedia.org/wiki/Gaussian_quadrature
pub fn gauss(num_points: usize) -> Rule<1> {
    let n = num_points;
    assert!(n > 0, "number of points must be positive");

    // Newton iteration on the roots of P_n, loosely following
    // Numerical Recipes, The art of Scientific Computing, Third Edition (2007).
    // Only the non-negative half of the roots is computed, the rest follows by symmetry.
    let m = (n + 1) / 2;
    let mut upper = Vec::with_capacity(m);

    for i in 0..m {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut recurrence = LegendreRecurrence::evaluate(n, x);
        loop {
            let dx = -recurrence.value() / recurrence.derivative();
            x += dx;
            recurrence = LegendreRecurrence::evaluate(n, x);
            if dx.abs() <= 1e-15 {
                break;
            }
        }

        let dp = recurrence.derivative();
        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        upper.push((x, w));
    }

    // The roots were found in descending order
    let mut weights = Vec::with_capacity(n);
    let mut points = Vec::with_capacity(n);
    for &(x, w) in &upper {
        points.push([-x]);
        weights.push(w);
    }
    let mirrored = if n % 2 == 1 { &upper[..m - 1] } else { &upper[..] };
    for &(x, w) in mirrored.iter().rev() {
        points.push([x]);
        weights.push(w);
    }

    assert_eq!(points.len(), n, "Internal error: incorrect number of points produced");
    (weights, points)
}

/// Gauss-Jacobi quadrature for the weight function `(1 - x)^alpha` on [-1, 1].
///
/// The rule satisfies
/// ```text
///   sum_i w_i f(x_i) = int_{-1}^{1} (1 - x)^alpha f(x) dx
/// ```
/// exactly for polynomials `f` of degree up to `2 n - 1`. The nodes are the eigenvalues of the
/// symmetric Jacobi matrix of the three-term recurrence (Golub-Welsch), and the weights
/// follow from the first components of the normalized eigenvectors.
///
/// # Panics
///
/// Panics if zero points are requested or if `alpha <= -1`.
pub fn gauss_jacobi(num_points: usize, alpha: f64) -> Rule<1> {
    let n = num_points;
    assert!(n > 0, "number of points must be positive");
    assert!(alpha > -1.0, "Jacobi parameter must be greater than -1");

    let mut jacobi = DMatrix::<f64>::zeros(n, n);
    for k in 0..n {
        let k_f = k as f64;
        let s = 2.0 * k_f + alpha;
        jacobi[(k, k)] = if k == 0 {
            -alpha / (alpha + 2.0)
        } else {
            -(alpha * alpha) / (s * (s + 2.0))
        };

        if k + 1 < n {
            let m = k_f + 1.0;
            let s = 2.0 * m + alpha;
            let b2 = 4.0 * m * (m + alpha) * m * (m + alpha) / (s * s * (s + 1.0) * (s - 1.0));
            jacobi[(k, k + 1)] = b2.sqrt();
            jacobi[(k + 1, k)] = b2.sqrt();
        }
    }

    // Integral of the weight function over [-1, 1]
    let mu0 = 2.0f64.powf(alpha + 1.0) / (alpha + 1.0);

    let eigen = SymmetricEigen::new(jacobi);
    let mut rule: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let v0 = eigen.eigenvectors[(0, i)];
            (eigen.eigenvalues[i], mu0 * v0 * v0)
        })
        .collect();
    rule.sort_by(|(x1, _), (x2, _)| x1.total_cmp(x2));

    rule.into_iter().map(|(x, w)| (w, [x])).unzip()
}
