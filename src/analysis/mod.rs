//! Analysis options and the equilibrium / compatibility solvers

mod axial;
mod flexure;

use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::error::{BeamError, BeamResult};
use crate::loads::Load;
use crate::math::{self, Mat, Piecewise, Vector};

pub(crate) use axial::solve_axial;
pub(crate) use flexure::solve_flexure;

/// Options for beam analysis and result reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Grid size used for extrema searches and sampled curves
    pub sample_points: usize,
    /// Decimal places for force, moment and deflection queries
    pub value_precision: u32,
    /// Decimal places for stored reactions
    pub reaction_precision: u32,
    /// Relative singular value cutoff for the rank check
    pub tolerance: f64,
    /// Gauss-Legendre panels for non-polynomial load expressions
    pub quadrature_panels: usize,
    /// Enable logging/progress output
    pub log: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            sample_points: 1000,
            value_precision: 3,
            reaction_precision: 5,
            tolerance: 1e-10,
            quadrature_panels: 16,
            log: false,
        }
    }
}

impl AnalysisOptions {
    /// Enable logging
    pub fn with_logging(mut self) -> Self {
        self.log = true;
        self
    }

    /// Set the sampling grid size
    pub fn with_sample_points(mut self, n: usize) -> Self {
        self.sample_points = n.max(2);
        self
    }

    /// Set value and reaction rounding
    pub fn with_precision(mut self, value: u32, reaction: u32) -> Self {
        self.value_precision = value;
        self.reaction_precision = reaction;
        self
    }

    /// Set the rank tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Set the quadrature panel count
    pub fn with_quadrature_panels(mut self, panels: usize) -> Self {
        self.quadrature_panels = panels.max(1);
        self
    }
}

/// Integration chain of a load, or of a superposed set of loads.
///
/// Flexural terms are multiplied by `E I` and axial terms by `E A`; the
/// solver divides by the section rigidities once reactions are known.
#[derive(Debug, Clone, Default)]
pub struct LoadResponse {
    /// `N(x)`, tension positive
    pub normal: Piecewise,
    /// `integral of N`, i.e. `E A u(x)` before the support offset
    pub normal_integral: Piecewise,
    /// `V(x)`, sum of transverse forces to the left
    pub shear: Piecewise,
    /// `M(x)`, sagging positive
    pub moment: Piecewise,
    /// `E I theta(x)` before integration constants
    pub slope: Piecewise,
    /// `E I delta(x)` before integration constants
    pub deflection: Piecewise,
    /// Total axial load
    pub axial_total: f64,
    /// Total transverse load
    pub transverse_total: f64,
    /// Anticlockwise moment of the loads about `x = 0`
    pub moment_about_origin: f64,
}

impl LoadResponse {
    /// Integrate the intensities of one load through the full chain
    pub fn new(load: &Load, panels: usize) -> Self {
        let w = load.intensities(panels);
        let normal = w.axial.integrate().scaled(-1.0);
        let normal_integral = normal.integrate();
        let shear = w.transverse.integrate();
        let moment = &shear.integrate() + &w.torque.integrate();
        let slope = moment.integrate();
        let deflection = slope.integrate();

        Self {
            normal,
            normal_integral,
            shear,
            moment,
            slope,
            deflection,
            axial_total: w.axial.total(),
            transverse_total: w.transverse.total(),
            moment_about_origin: w.transverse.first_moment() - w.torque.total(),
        }
    }
}

impl Add for &LoadResponse {
    type Output = LoadResponse;

    fn add(self, rhs: &LoadResponse) -> LoadResponse {
        LoadResponse {
            normal: &self.normal + &rhs.normal,
            normal_integral: &self.normal_integral + &rhs.normal_integral,
            shear: &self.shear + &rhs.shear,
            moment: &self.moment + &rhs.moment,
            slope: &self.slope + &rhs.slope,
            deflection: &self.deflection + &rhs.deflection,
            axial_total: self.axial_total + rhs.axial_total,
            transverse_total: self.transverse_total + rhs.transverse_total,
            moment_about_origin: self.moment_about_origin + rhs.moment_about_origin,
        }
    }
}

/// Solve a square system after checking it has full rank.
///
/// Rows are equilibrated first so force, moment and compatibility rows are
/// compared on the same scale.
pub(crate) fn solve_system(
    name: &str,
    a: &Mat,
    b: &Vector,
    options: &AnalysisOptions,
) -> BeamResult<Vector> {
    let n = a.ncols();
    if a.nrows() != n {
        return Err(BeamError::AnalysisFailed(format!(
            "{} system is {}x{}, expected a square system",
            name,
            a.nrows(),
            n
        )));
    }
    let (ae, be) = math::equilibrate(a, b);
    let rank = math::numerical_rank(&ae, options.tolerance);
    log::debug!("{} system: {} unknowns, rank {}", name, n, rank);
    log::trace!("{} matrix (equilibrated): {}", name, ae);
    if rank < n {
        return Err(BeamError::SingularSystem(name.to_string()));
    }
    let x = math::solve_linear_system(&ae, &be)
        .ok_or_else(|| BeamError::SingularSystem(name.to_string()))?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(BeamError::AnalysisFailed(format!(
            "{} system produced non-finite reactions",
            name
        )));
    }
    Ok(x)
}

/// `<x - a>^n` evaluated at a point, with `<0>^0 = 1`
pub(crate) fn macaulay(x: f64, a: f64, n: i32) -> f64 {
    if x < a {
        0.0
    } else {
        (x - a).powi(n)
    }
}
