//! Transverse equilibrium and bending compatibility
//!
//! Unknowns are ordered: transverse reactions, moment reactions, then the
//! integration constants `C1` (slope) and `C2` (deflection). The rows are
//! vertical equilibrium, moments about `x = 0`, one zero-rotation row per
//! rotationally fixed support and one displacement row per transverse
//! support. Rows and unknowns balance, so the system is always square.

use super::{macaulay, solve_system, AnalysisOptions, LoadResponse};
use crate::elements::{Restraint, Support};
use crate::error::BeamResult;
use crate::math::{Mat, Vector};

/// Reactions and integration constants of the flexural system
#[derive(Debug, Clone)]
pub(crate) struct FlexuralSolution {
    /// `(support index, R_y)` for each transverse channel
    pub transverse: Vec<(usize, f64)>,
    /// `(support index, R_m)` for each rotational channel, clockwise positive
    pub moment: Vec<(usize, f64)>,
    /// `E I theta` constant
    pub c1: f64,
    /// `E I delta` constant
    pub c2: f64,
}

pub(crate) fn solve_flexure(
    supports: &[Support],
    loads: &LoadResponse,
    ei: f64,
    options: &AnalysisOptions,
) -> BeamResult<FlexuralSolution> {
    let transverse: Vec<usize> = (0..supports.len())
        .filter(|&i| supports[i].transverse.is_reactive())
        .collect();
    let rotational: Vec<usize> = (0..supports.len())
        .filter(|&i| supports[i].rotational.is_reactive())
        .collect();

    let nt = transverse.len();
    let nr = rotational.len();
    let n = nt + nr + 2;
    let (c1_col, c2_col) = (nt + nr, nt + nr + 1);

    let mut a = Mat::zeros(n, n);
    let mut b = Vector::zeros(n);

    // Vertical equilibrium
    for j in 0..nt {
        a[(0, j)] = 1.0;
    }
    b[0] = -loads.transverse_total;

    // Anticlockwise moments about the origin
    for (j, &s) in transverse.iter().enumerate() {
        a[(1, j)] = supports[s].position;
    }
    for k in 0..nr {
        a[(1, nt + k)] = -1.0;
    }
    b[1] = -loads.moment_about_origin;

    let mut row = 2;

    // E I theta(p) = 0 at rotationally fixed supports
    for &s in &rotational {
        let p = supports[s].position;
        for (j, &t) in transverse.iter().enumerate() {
            a[(row, j)] = macaulay(p, supports[t].position, 2) / 2.0;
        }
        for (k, &r) in rotational.iter().enumerate() {
            a[(row, nt + k)] = macaulay(p, supports[r].position, 1);
        }
        a[(row, c1_col)] = 1.0;
        b[row] = -loads.slope.eval(p);
        row += 1;
    }

    // E I delta(p) + (E I / k) R = 0 at transverse supports
    for (i, &s) in transverse.iter().enumerate() {
        let p = supports[s].position;
        for (j, &t) in transverse.iter().enumerate() {
            a[(row, j)] = macaulay(p, supports[t].position, 3) / 6.0;
        }
        if let Restraint::Spring(k) = supports[s].transverse {
            a[(row, i)] += ei / k;
        }
        for (k, &r) in rotational.iter().enumerate() {
            a[(row, nt + k)] = macaulay(p, supports[r].position, 2) / 2.0;
        }
        a[(row, c1_col)] = p;
        a[(row, c2_col)] = 1.0;
        b[row] = -loads.deflection.eval(p);
        row += 1;
    }

    let x = solve_system("flexural", &a, &b, options)?;

    Ok(FlexuralSolution {
        transverse: transverse.iter().enumerate().map(|(j, &s)| (s, x[j])).collect(),
        moment: rotational.iter().enumerate().map(|(k, &s)| (s, x[nt + k])).collect(),
        c1: x[c1_col],
        c2: x[c2_col],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{Load, PointForce, Udl};
    use approx::assert_relative_eq;

    fn response(loads: &[Load]) -> LoadResponse {
        loads
            .iter()
            .map(|l| LoadResponse::new(l, 16))
            .fold(LoadResponse::default(), |acc, r| &acc + &r)
    }

    #[test]
    fn test_simply_supported_point_load() {
        let supports = [Support::pinned(0.0).unwrap(), Support::roller(5.0).unwrap()];
        let loads = response(&[PointForce::vertical(-10.0, 2.5).unwrap().into()]);
        let sol = solve_flexure(&supports, &loads, 1.0, &AnalysisOptions::default()).unwrap();
        assert_eq!(sol.transverse.len(), 2);
        assert_relative_eq!(sol.transverse[0].1, 5.0, epsilon = 1e-9);
        assert_relative_eq!(sol.transverse[1].1, 5.0, epsilon = 1e-9);
        assert!(sol.moment.is_empty());
        // Deflection pinned to zero at the left support
        assert_relative_eq!(sol.c2, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cantilever_reactions() {
        let supports = [Support::fixed(0.0).unwrap()];
        let loads = response(&[PointForce::vertical(-5.0, 4.0).unwrap().into()]);
        let sol = solve_flexure(&supports, &loads, 1.0, &AnalysisOptions::default()).unwrap();
        assert_relative_eq!(sol.transverse[0].1, 5.0, epsilon = 1e-9);
        assert_relative_eq!(sol.moment[0].1, -20.0, epsilon = 1e-9);
        assert_relative_eq!(sol.c1, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_propped_cantilever_udl() {
        // Fixed at 0, prop at L: prop carries 3wL/8
        let (w, l) = (2.0, 6.0);
        let supports = [Support::fixed(0.0).unwrap(), Support::roller(l).unwrap()];
        let loads = response(&[Udl::vertical(-w, (0.0, l)).unwrap().into()]);
        let sol = solve_flexure(&supports, &loads, 1.0, &AnalysisOptions::default()).unwrap();
        assert_relative_eq!(sol.transverse[1].1, 3.0 * w * l / 8.0, epsilon = 1e-9);
        assert_relative_eq!(sol.transverse[0].1, 5.0 * w * l / 8.0, epsilon = 1e-9);
        // Hogging fixed-end moment wL^2/8, clockwise-positive reaction
        assert_relative_eq!(sol.moment[0].1, -w * l * l / 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_two_rotational_restraints_only_is_singular() {
        let supports = [
            Support::new(0.0, (true, false, true)).unwrap(),
            Support::new(4.0, (false, false, true)).unwrap(),
        ];
        let loads = response(&[PointForce::vertical(-1.0, 2.0).unwrap().into()]);
        assert!(solve_flexure(&supports, &loads, 1.0, &AnalysisOptions::default()).is_err());
    }
}
