//! Axial equilibrium and compatibility

use super::{macaulay, solve_system, AnalysisOptions, LoadResponse};
use crate::elements::{Restraint, Support};
use crate::error::{BeamError, BeamResult};
use crate::math::{Mat, Vector};

/// Axial reactions and the displacement at the first axial support
#[derive(Debug, Clone)]
pub(crate) struct AxialSolution {
    /// `(support index, R_x)` sorted by position
    pub reactions: Vec<(usize, f64)>,
    /// Position of the leftmost axial support
    pub origin: f64,
    /// Axial displacement there, `-R0 / k0` for a spring and zero if rigid
    pub origin_displacement: f64,
}

/// Solve for axial reactions.
///
/// Row 0 is axial equilibrium. Every further support `j` adds the
/// compatibility row `(I_N(pj) - I_N(p0)) / EA + Rj/kj - R0/k0 = 0`, where
/// `I_N` is the running integral of the normal force; spring terms drop out
/// for rigid channels. The whole row is scaled by `EA`.
pub(crate) fn solve_axial(
    supports: &[Support],
    loads: &LoadResponse,
    ea: f64,
    options: &AnalysisOptions,
) -> BeamResult<AxialSolution> {
    let mut order: Vec<usize> = (0..supports.len())
        .filter(|&i| supports[i].axial.is_reactive())
        .collect();
    order.sort_by(|&i, &j| supports[i].position.total_cmp(&supports[j].position));

    let first = *order
        .first()
        .ok_or_else(|| BeamError::Unstable("no axial restraint".to_string()))?;
    let p0 = supports[first].position;
    let flexibility = |i: usize| match supports[i].axial {
        Restraint::Spring(k) => ea / k,
        _ => 0.0,
    };

    let n = order.len();
    let mut a = Mat::zeros(n, n);
    let mut b = Vector::zeros(n);

    for j in 0..n {
        a[(0, j)] = 1.0;
    }
    b[0] = -loads.axial_total;

    let base = loads.normal_integral.eval(p0);
    for (row, &s) in order.iter().enumerate().skip(1) {
        let pj = supports[s].position;
        // Reaction Ri at pi adds -<x - pi> to I_N
        for (col, &t) in order.iter().enumerate() {
            a[(row, col)] = -macaulay(pj, supports[t].position, 1);
        }
        a[(row, row)] += flexibility(s);
        a[(row, 0)] -= flexibility(first);
        b[row] = -(loads.normal_integral.eval(pj) - base);
    }

    let x = solve_system("axial", &a, &b, options)?;

    let reactions: Vec<(usize, f64)> = order.iter().enumerate().map(|(j, &s)| (s, x[j])).collect();
    let origin_displacement = match supports[first].axial {
        Restraint::Spring(k) => -x[0] / k,
        _ => 0.0,
    };

    Ok(AxialSolution {
        reactions,
        origin: p0,
        origin_displacement,
    })
}
