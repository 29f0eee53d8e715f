use super::factorial;
use matrixcompare::assert_scalar_eq;
use reftensor_quadrature::simplex::{tetrahedron_collapsed_gauss, triangle_collapsed_gauss, vertex};
use reftensor_quadrature::{integrate, Error};

/// Exact integral of `u^i v^j` over the triangle with vertices (-1, -1), (1, -1), (-1, 1),
/// where `u = (1 + x) / 2` and `v = (1 + y) / 2`.
///
/// Uses the affine map from the unit triangle, on which
/// `int u^i v^j = i! j! / (i + j + 2)!`. Since the shifted monomials span the same
/// polynomial spaces as `x^a y^b`, testing them checks the same exactness property
/// without any cancellation in the reference values.
fn triangle_monomial_integral(i: u32, j: u32) -> f64 {
    4.0 * factorial(i) * factorial(j) / factorial(i + j + 2)
}

/// Exact integral of `u^i v^j w^k` over the biunit reference tetrahedron.
fn tetrahedron_monomial_integral(i: u32, j: u32, k: u32) -> f64 {
    8.0 * factorial(i) * factorial(j) * factorial(k) / factorial(i + j + k + 3)
}

fn shifted(x: f64) -> f64 {
    0.5 * (1.0 + x)
}

#[test]
fn triangle_rules_integrate_total_degree_exactly() {
    for n in 1..=8 {
        let degree = 2 * n as u32 - 1;
        let rule = triangle_collapsed_gauss(n).unwrap();
        assert_eq!(rule.0.len(), n * n);
        assert!(rule.0.iter().all(|&w| w > 0.0));
        for a in 0..=degree {
            for b in 0..=(degree - a) {
                let estimated = integrate(&rule, |&[x, y]| shifted(x).powi(a as i32) * shifted(y).powi(b as i32));
                let expected = triangle_monomial_integral(a, b);
                assert_scalar_eq!(estimated, expected, comp = abs, tol = 1e-12);
            }
        }
    }
}

#[test]
fn triangle_points_lie_inside_reference_triangle() {
    let (_, points) = triangle_collapsed_gauss(5).unwrap();
    for [x, y] in points {
        assert!(x > -1.0 && y > -1.0 && x + y < 0.0);
    }
}

#[test]
fn tetrahedron_rules_integrate_total_degree_exactly() {
    for n in 1..=5 {
        let degree = 2 * n as u32 - 1;
        let rule = tetrahedron_collapsed_gauss(n).unwrap();
        assert_eq!(rule.0.len(), n * n * n);
        assert_scalar_eq!(rule.0.iter().sum::<f64>(), 4.0 / 3.0, comp = abs, tol = 1e-13);
        for a in 0..=degree {
            for b in 0..=(degree - a) {
                for c in 0..=(degree - a - b) {
                    let estimated = integrate(&rule, |&[x, y, z]| {
                        shifted(x).powi(a as i32) * shifted(y).powi(b as i32) * shifted(z).powi(c as i32)
                    });
                    let expected = tetrahedron_monomial_integral(a, b, c);
                    assert_scalar_eq!(estimated, expected, comp = abs, tol = 1e-12);
                }
            }
        }
    }
}

#[test]
fn vertex_rule_is_a_single_unit_point() {
    let rule = vertex();
    assert_eq!(rule.0, vec![1.0]);
    assert_eq!(rule.1.len(), 1);
}

#[test]
fn simplex_rules_reject_zero_points() {
    assert_eq!(triangle_collapsed_gauss(0), Err(Error::ZeroPoints));
    assert_eq!(tetrahedron_collapsed_gauss(0), Err(Error::ZeroPoints));
}
