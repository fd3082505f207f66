//! Distributed loads over a span of the beam

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_non_negative, BeamError, BeamResult};
use crate::math::{LoadExpression, Polynomial};

fn check_span(span: (f64, f64)) -> BeamResult<(f64, f64)> {
    let start = ensure_non_negative("span start", span.0)?;
    let end = ensure_non_negative("span end", span.1)?;
    if end <= start {
        return Err(BeamError::invalid_input(
            "span",
            format!("end {} must be greater than start {}", end, start),
        ));
    }
    Ok((start, end))
}

/// A uniformly distributed load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Udl {
    /// Force per unit length along the load direction
    pub magnitude: f64,
    /// Start and end coordinates
    pub span: (f64, f64),
    /// Direction in degrees, 0 = +x (axial), 90 = +y (upward)
    pub angle: f64,
}

impl Udl {
    pub fn new(magnitude: f64, span: (f64, f64), angle: f64) -> BeamResult<Self> {
        Ok(Self {
            magnitude: ensure_finite("udl magnitude", magnitude)?,
            span: check_span(span)?,
            angle: ensure_finite("angle", angle)?,
        })
    }

    pub fn vertical(magnitude: f64, span: (f64, f64)) -> BeamResult<Self> {
        Self::new(magnitude, span, 90.0)
    }

    pub fn horizontal(magnitude: f64, span: (f64, f64)) -> BeamResult<Self> {
        Self::new(magnitude, span, 0.0)
    }

    /// Intensity in global `x` along the load direction
    pub fn profile(&self) -> Polynomial {
        Polynomial::constant(self.magnitude)
    }

    /// Get the total force from this load
    pub fn total_force(&self) -> f64 {
        self.magnitude * (self.span.1 - self.span.0)
    }
}

/// A linearly varying load from `magnitudes.0` at the span start to
/// `magnitudes.1` at the span end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrapezoidalLoad {
    /// Intensity at the start and end of the span
    pub magnitudes: (f64, f64),
    /// Start and end coordinates
    pub span: (f64, f64),
    /// Direction in degrees
    pub angle: f64,
}

impl TrapezoidalLoad {
    pub fn new(magnitudes: (f64, f64), span: (f64, f64), angle: f64) -> BeamResult<Self> {
        Ok(Self {
            magnitudes: (
                ensure_finite("start magnitude", magnitudes.0)?,
                ensure_finite("end magnitude", magnitudes.1)?,
            ),
            span: check_span(span)?,
            angle: ensure_finite("angle", angle)?,
        })
    }

    pub fn vertical(magnitudes: (f64, f64), span: (f64, f64)) -> BeamResult<Self> {
        Self::new(magnitudes, span, 90.0)
    }

    pub fn horizontal(magnitudes: (f64, f64), span: (f64, f64)) -> BeamResult<Self> {
        Self::new(magnitudes, span, 0.0)
    }

    /// Check if the load is uniform (constant magnitude)
    pub fn is_uniform(&self) -> bool {
        self.magnitudes.0 == self.magnitudes.1
    }

    /// Intensity in global `x`: `q_a + slope (x - a)`
    pub fn profile(&self) -> Polynomial {
        let (a, b) = self.span;
        let (qa, qb) = self.magnitudes;
        if self.is_uniform() {
            return Polynomial::constant(qa);
        }
        let slope = (qb - qa) / (b - a);
        Polynomial::new(vec![qa, slope]).shifted(-a)
    }

    pub fn total_force(&self) -> f64 {
        0.5 * (self.magnitudes.0 + self.magnitudes.1) * (self.span.1 - self.span.0)
    }
}

/// A load whose intensity is an arbitrary expression of the beam coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Intensity along the load direction as a function of `x`
    pub expr: LoadExpression,
    /// Start and end coordinates
    pub span: (f64, f64),
    /// Direction in degrees
    pub angle: f64,
}

impl DistributedLoad {
    pub fn new(expr: LoadExpression, span: (f64, f64), angle: f64) -> BeamResult<Self> {
        let span = check_span(span)?;
        // Reject expressions that blow up inside the span, e.g. ln(x) from 0
        for x in [span.0, 0.5 * (span.0 + span.1), span.1] {
            let v = expr.eval(x);
            if !v.is_finite() {
                return Err(BeamError::InvalidExpression {
                    expr: expr.source().to_string(),
                    reason: format!("evaluates to {} at x = {}", v, x),
                });
            }
        }
        Ok(Self {
            expr,
            span,
            angle: ensure_finite("angle", angle)?,
        })
    }

    /// Parse `expr` and build the load
    pub fn parse(expr: &str, span: (f64, f64), angle: f64) -> BeamResult<Self> {
        Self::new(LoadExpression::parse(expr)?, span, angle)
    }

    pub fn vertical(expr: &str, span: (f64, f64)) -> BeamResult<Self> {
        Self::parse(expr, span, 90.0)
    }

    pub fn horizontal(expr: &str, span: (f64, f64)) -> BeamResult<Self> {
        Self::parse(expr, span, 0.0)
    }
}
