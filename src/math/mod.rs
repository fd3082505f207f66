//! Mathematical utilities for the beam solver

pub mod expression;
pub mod piecewise;
pub mod polynomial;

use nalgebra::{DMatrix, DVector};

pub use expression::LoadExpression;
pub use piecewise::Piecewise;
pub use polynomial::Polynomial;

pub type Mat = DMatrix<f64>;
pub type Vector = DVector<f64>;

/// 5-point Gauss-Legendre abscissae and weights on [-1, 1]
const GAUSS_POINTS_5: [(f64, f64); 5] = [
    (-0.906_179_845_938_664, 0.236_926_885_056_189_1),
    (-0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (0.0, 0.568_888_888_888_888_9),
    (0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (0.906_179_845_938_664, 0.236_926_885_056_189_1),
];

/// Composite Gauss-Legendre quadrature of `f` over `[a, b]`
pub fn gauss_legendre(a: f64, b: f64, panels: usize, f: impl Fn(f64) -> f64) -> f64 {
    if a == b {
        return 0.0;
    }
    let panels = panels.max(1);
    let h = (b - a) / panels as f64;
    let mut total = 0.0;
    for p in 0..panels {
        let mid = a + h * (p as f64 + 0.5);
        let jac = 0.5 * h;
        for (xi, weight) in GAUSS_POINTS_5 {
            total += weight * f(mid + jac * xi) * jac;
        }
    }
    total
}

/// Round half away from zero to a number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    // Avoid reporting -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Scale every row of `[a | b]` by the largest magnitude in that row of `a`
///
/// Force, moment and compatibility rows differ by several orders of
/// magnitude, so the rank test is done on the equilibrated system.
pub fn equilibrate(a: &Mat, b: &Vector) -> (Mat, Vector) {
    let mut a = a.clone();
    let mut b = b.clone();
    for i in 0..a.nrows() {
        let scale = a.row(i).amax();
        if scale > 0.0 {
            a.row_mut(i).scale_mut(1.0 / scale);
            b[i] /= scale;
        }
    }
    (a, b)
}

/// Numerical rank from singular values relative to the largest one
pub fn numerical_rank(a: &Mat, tolerance: f64) -> usize {
    if a.nrows() == 0 || a.ncols() == 0 {
        return 0;
    }
    let sv = a.clone().svd(false, false).singular_values;
    let largest = sv.iter().cloned().fold(0.0_f64, f64::max);
    if largest == 0.0 {
        return 0;
    }
    sv.iter().filter(|s| **s > tolerance * largest).count()
}

/// Solve a linear system using LU decomposition
pub fn solve_linear_system(a: &Mat, b: &Vector) -> Option<Vector> {
    a.clone().lu().solve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gauss_legendre_exact_for_polynomials() {
        let v = gauss_legendre(0.0, 2.0, 1, |x| x.powi(9));
        assert_relative_eq!(v, 2f64.powi(10) / 10.0, epsilon = 1e-9);
        assert_relative_eq!(gauss_legendre(0.0, std::f64::consts::PI, 8, f64::sin), 2.0, epsilon = 1e-12);
        assert_eq!(gauss_legendre(1.0, 1.0, 4, |x| x), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.49951, 3), 12.5);
        assert_eq!(round_to(-0.0004, 3), 0.0);
        assert!(round_to(-0.0004, 3).is_sign_positive());
        assert_eq!(round_to(1.234_567, 5), 1.23457);
    }

    #[test]
    fn test_rank_after_equilibration() {
        // Second row is a multiple of the first once scaled
        let a = Mat::from_row_slice(3, 2, &[1.0, 2.0, 1e6, 2e6, 0.0, 1.0]);
        let b = Vector::from_vec(vec![1.0, 1e6, 3.0]);
        let (ae, be) = equilibrate(&a, &b);
        assert_relative_eq!(ae[(1, 1)], 1.0);
        assert_relative_eq!(be[1], 0.5);
        assert_eq!(numerical_rank(&ae, 1e-10), 2);
    }

    #[test]
    fn test_solve_linear_system() {
        let a = Mat::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = Vector::from_vec(vec![3.0, 5.0]);
        let x = solve_linear_system(&a, &b).unwrap();
        assert_relative_eq!(x[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.4, epsilon = 1e-12);
    }
}
