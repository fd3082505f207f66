//! Concentrated forces and torques

use serde::{Deserialize, Serialize};

use super::project;
use crate::error::{ensure_finite, ensure_non_negative, BeamResult};

/// A concentrated force at a beam coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointForce {
    /// Force magnitude along the load direction
    pub magnitude: f64,
    /// Distance from the left end of the beam
    pub position: f64,
    /// Direction in degrees, 0 = +x (axial), 90 = +y (upward)
    pub angle: f64,
}

impl PointForce {
    /// Create a new point force
    pub fn new(magnitude: f64, position: f64, angle: f64) -> BeamResult<Self> {
        Ok(Self {
            magnitude: ensure_finite("force", magnitude)?,
            position: ensure_non_negative("coordinate", position)?,
            angle: ensure_finite("angle", angle)?,
        })
    }

    /// Transverse force, positive upward
    pub fn vertical(magnitude: f64, position: f64) -> BeamResult<Self> {
        Self::new(magnitude, position, 90.0)
    }

    /// Axial force, positive toward +x
    pub fn horizontal(magnitude: f64, position: f64) -> BeamResult<Self> {
        Self::new(magnitude, position, 0.0)
    }

    /// Axial and transverse components
    pub fn components(&self) -> (f64, f64) {
        let (cos, sin) = project(self.angle);
        (self.magnitude * cos, self.magnitude * sin)
    }
}

/// A concentrated couple, positive clockwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointTorque {
    /// Torque magnitude, positive clockwise
    pub magnitude: f64,
    /// Distance from the left end of the beam
    pub position: f64,
}

impl PointTorque {
    /// Create a new point torque
    pub fn new(magnitude: f64, position: f64) -> BeamResult<Self> {
        Ok(Self {
            magnitude: ensure_finite("torque", magnitude)?,
            position: ensure_non_negative("coordinate", position)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_components_snap_to_zero() {
        let f = PointForce::vertical(-10.0, 2.5).unwrap();
        let (fx, fy) = f.components();
        assert_eq!(fx, 0.0);
        assert_eq!(fy, -10.0);

        let h = PointForce::horizontal(3.0, 1.0).unwrap();
        assert_eq!(h.components(), (3.0, 0.0));

        let inclined = PointForce::new(10.0, 1.0, 30.0).unwrap();
        let (fx, fy) = inclined.components();
        assert_relative_eq!(fx, 8.660254037844387, epsilon = 1e-12);
        assert_relative_eq!(fy, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(PointForce::new(f64::NAN, 1.0, 90.0).is_err());
        assert!(PointForce::new(1.0, -1.0, 90.0).is_err());
        assert!(PointTorque::new(5.0, f64::INFINITY).is_err());
        assert!(PointTorque::new(5.0, 0.0).is_ok());
    }
}
