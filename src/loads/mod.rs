//! Load types applied to the beam
//!
//! Every load reduces to three piecewise intensities: axial `w_x(x)`,
//! transverse `w_y(x)` and a train of clockwise torque impulses.

mod distributed;
mod point_load;

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

pub use distributed::{DistributedLoad, TrapezoidalLoad, Udl};
pub use point_load::{PointForce, PointTorque};

use crate::error::{BeamError, BeamResult};
use crate::math::{Piecewise, Polynomial};

/// Projection factors `(cos, sin)` of a direction given in degrees.
/// Components below 1e-10 are treated as zero so that 90 deg has no axial part.
pub fn project(angle: f64) -> (f64, f64) {
    let rad = angle.to_radians();
    let snap = |v: f64| if v.abs() < 1e-10 { 0.0 } else { v };
    (snap(rad.cos()), snap(rad.sin()))
}

/// Intensity functions produced by a single load
#[derive(Debug, Clone)]
pub struct LoadIntensity {
    /// Axial intensity `w_x(x)`, positive toward +x
    pub axial: Piecewise,
    /// Transverse intensity `w_y(x)`, positive upward
    pub transverse: Piecewise,
    /// Clockwise torque impulses
    pub torque: Piecewise,
}

/// A load acting on the beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Load {
    PointForce(PointForce),
    PointTorque(PointTorque),
    Udl(Udl),
    Trapezoidal(TrapezoidalLoad),
    Distributed(DistributedLoad),
}

impl Load {
    /// Coordinates the load occupies, `(a, a)` for concentrated loads
    pub fn extent(&self) -> (f64, f64) {
        match self {
            Load::PointForce(p) => (p.position, p.position),
            Load::PointTorque(t) => (t.position, t.position),
            Load::Udl(u) => u.span,
            Load::Trapezoidal(t) => t.span,
            Load::Distributed(d) => d.span,
        }
    }

    /// Check the load lies on a beam of length `span`
    pub fn validate_placement(&self, span: f64) -> BeamResult<()> {
        let (start, end) = self.extent();
        for coordinate in [start, end] {
            if coordinate < 0.0 || coordinate > span {
                return Err(BeamError::out_of_bounds(self.kind(), coordinate, span));
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Load::PointForce(_) => "point force",
            Load::PointTorque(_) => "point torque",
            Load::Udl(_) => "udl",
            Load::Trapezoidal(_) => "trapezoidal load",
            Load::Distributed(_) => "distributed load",
        }
    }

    fn angle(&self) -> f64 {
        match self {
            Load::PointForce(p) => p.angle,
            Load::PointTorque(_) => 0.0,
            Load::Udl(u) => u.angle,
            Load::Trapezoidal(t) => t.angle,
            Load::Distributed(d) => d.angle,
        }
    }

    /// Build the intensity functions. `panels` sets the quadrature used for
    /// expressions without a polynomial form.
    pub fn intensities(&self, panels: usize) -> LoadIntensity {
        let (cos, sin) = project(self.angle());
        let spread = |poly: &Polynomial, (a, b): (f64, f64)| -> (Piecewise, Piecewise) {
            let base = Piecewise::span(poly, a, b);
            (base.scaled(cos), base.scaled(sin))
        };

        let (axial, transverse, torque) = match self {
            Load::PointForce(p) => {
                let (fx, fy) = p.components();
                (
                    Piecewise::impulse(fx, p.position),
                    Piecewise::impulse(fy, p.position),
                    Piecewise::zero(),
                )
            }
            Load::PointTorque(t) => (
                Piecewise::zero(),
                Piecewise::zero(),
                Piecewise::impulse(t.magnitude, t.position),
            ),
            Load::Udl(u) => {
                let (x, y) = spread(&u.profile(), u.span);
                (x, y, Piecewise::zero())
            }
            Load::Trapezoidal(t) => {
                let (x, y) = spread(&t.profile(), t.span);
                (x, y, Piecewise::zero())
            }
            Load::Distributed(d) => {
                let (a, b) = d.span;
                let base = Piecewise::span_expression(&d.expr, a, b, panels);
                (base.scaled(cos), base.scaled(sin), Piecewise::zero())
            }
        };

        LoadIntensity {
            axial,
            transverse,
            torque,
        }
    }

    /// Total axial and transverse force
    pub fn resultant(&self, panels: usize) -> (f64, f64) {
        let w = self.intensities(panels);
        (w.axial.total(), w.transverse.total())
    }

    /// Anticlockwise moment about `x = 0`: `integral of w_y x dx` minus
    /// clockwise torques
    pub fn moment_about_origin(&self, panels: usize) -> f64 {
        let w = self.intensities(panels);
        w.transverse.first_moment() - w.torque.total()
    }

    /// Field values as bit patterns with `-0.0` folded into `0.0`
    fn hash_key(&self) -> (u8, Vec<u64>, Option<&str>) {
        let bits = |v: f64| if v == 0.0 { 0u64 } else { v.to_bits() };
        match self {
            Load::PointForce(p) => (0, vec![bits(p.magnitude), bits(p.position), bits(p.angle)], None),
            Load::PointTorque(t) => (1, vec![bits(t.magnitude), bits(t.position)], None),
            Load::Udl(u) => (
                2,
                vec![bits(u.magnitude), bits(u.span.0), bits(u.span.1), bits(u.angle)],
                None,
            ),
            Load::Trapezoidal(t) => (
                3,
                vec![
                    bits(t.magnitudes.0),
                    bits(t.magnitudes.1),
                    bits(t.span.0),
                    bits(t.span.1),
                    bits(t.angle),
                ],
                None,
            ),
            Load::Distributed(d) => (
                4,
                vec![bits(d.span.0), bits(d.span.1), bits(d.angle)],
                Some(d.expr.source()),
            ),
        }
    }
}

// Constructors validate against NaN, so equality is total in practice.
impl Eq for Load {}

impl Hash for Load {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_key().hash(state);
    }
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Load::PointForce(p) => write!(f, "PointForce({} at {}, {} deg)", p.magnitude, p.position, p.angle),
            Load::PointTorque(t) => write!(f, "PointTorque({} at {})", t.magnitude, t.position),
            Load::Udl(u) => write!(f, "Udl({} on [{}, {}], {} deg)", u.magnitude, u.span.0, u.span.1, u.angle),
            Load::Trapezoidal(t) => write!(
                f,
                "TrapezoidalLoad({} -> {} on [{}, {}], {} deg)",
                t.magnitudes.0, t.magnitudes.1, t.span.0, t.span.1, t.angle
            ),
            Load::Distributed(d) => write!(
                f,
                "DistributedLoad({} on [{}, {}], {} deg)",
                d.expr, d.span.0, d.span.1, d.angle
            ),
        }
    }
}

impl From<PointForce> for Load {
    fn from(load: PointForce) -> Self {
        Load::PointForce(load)
    }
}

impl From<PointTorque> for Load {
    fn from(load: PointTorque) -> Self {
        Load::PointTorque(load)
    }
}

impl From<Udl> for Load {
    fn from(load: Udl) -> Self {
        Load::Udl(load)
    }
}

impl From<TrapezoidalLoad> for Load {
    fn from(load: TrapezoidalLoad) -> Self {
        Load::Trapezoidal(load)
    }
}

impl From<DistributedLoad> for Load {
    fn from(load: DistributedLoad) -> Self {
        Load::Distributed(load)
    }
}
