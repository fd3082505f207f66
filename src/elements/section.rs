//! Section and material properties of the beam

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, BeamResult};

/// Elastic properties of the beam cross-section.
///
/// Units are whatever the caller uses consistently with loads and lengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Young's modulus
    pub e: f64,
    /// Second moment of area about the bending axis
    pub i: f64,
    /// Cross-sectional area
    pub a: f64,
}

impl Section {
    /// Create a new section, rejecting non-positive properties
    pub fn new(e: f64, i: f64, a: f64) -> BeamResult<Self> {
        Ok(Self {
            e: ensure_positive("E", e)?,
            i: ensure_positive("I", i)?,
            a: ensure_positive("A", a)?,
        })
    }

    /// Create a solid rectangular section
    pub fn rectangular(e: f64, width: f64, depth: f64) -> BeamResult<Self> {
        let width = ensure_positive("width", width)?;
        let depth = ensure_positive("depth", depth)?;
        Self::new(e, width * depth.powi(3) / 12.0, width * depth)
    }

    /// Create a solid circular section
    pub fn circular(e: f64, diameter: f64) -> BeamResult<Self> {
        let r = ensure_positive("diameter", diameter)? / 2.0;
        let a = std::f64::consts::PI * r.powi(2);
        let i = std::f64::consts::PI * r.powi(4) / 4.0;
        Self::new(e, i, a)
    }

    /// Flexural rigidity `E I`
    pub fn ei(&self) -> f64 {
        self.e * self.i
    }

    /// Axial rigidity `E A`
    pub fn ea(&self) -> f64 {
        self.e * self.a
    }
}

impl Default for Section {
    fn default() -> Self {
        // Steel, 200 GPa, with a 150UB18-sized section in metres
        Self {
            e: 200e9,
            i: 9.05e-6,
            a: 2.3e-3,
        }
    }
}
