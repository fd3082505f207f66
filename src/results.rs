//! Result types for beam analysis

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::elements::{Section, Support};
use crate::error::BeamResult;
use crate::loads::Load;
use crate::math::Piecewise;

/// Reaction components at a support
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    /// Reaction force along the beam axis, positive toward +x
    pub axial: f64,
    /// Reaction force perpendicular to the beam, positive upward
    pub transverse: f64,
    /// Reaction moment, positive clockwise
    pub moment: f64,
}

impl Reactions {
    pub fn new(axial: f64, transverse: f64, moment: f64) -> Self {
        Self {
            axial,
            transverse,
            moment,
        }
    }

    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        (self.axial.powi(2) + self.transverse.powi(2)).sqrt()
    }
}

/// Reactions keyed by support position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportReaction {
    pub position: f64,
    #[serde(flatten)]
    pub reactions: Reactions,
}

/// Result function of the beam coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    NormalForce,
    ShearForce,
    BendingMoment,
    Slope,
    Deflection,
    AxialDeflection,
}

impl Quantity {
    pub const ALL: [Quantity; 6] = [
        Quantity::NormalForce,
        Quantity::ShearForce,
        Quantity::BendingMoment,
        Quantity::Slope,
        Quantity::Deflection,
        Quantity::AxialDeflection,
    ];
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantity::NormalForce => "Normal Force",
            Quantity::ShearForce => "Shear Force",
            Quantity::BendingMoment => "Bending Moment",
            Quantity::Slope => "Slope",
            Quantity::Deflection => "Deflection",
            Quantity::AxialDeflection => "Axial Deflection",
        };
        write!(f, "{}", name)
    }
}

/// What to extract from a result function.
///
/// Flags take priority over coordinates: max, then min, then abs-max.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub points: Vec<f64>,
    pub max: bool,
    pub min: bool,
    pub abs_max: bool,
}

impl Query {
    /// Value at one coordinate
    pub fn at(x: f64) -> Self {
        Self::points(vec![x])
    }

    /// Values at several coordinates
    pub fn points(points: Vec<f64>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    pub fn max() -> Self {
        Self {
            max: true,
            ..Self::default()
        }
    }

    pub fn min() -> Self {
        Self {
            min: true,
            ..Self::default()
        }
    }

    /// Largest magnitude over the span, without sign
    pub fn abs_max() -> Self {
        Self {
            abs_max: true,
            ..Self::default()
        }
    }
}

/// Answer to a [`Query`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// An extremum, or the value at a single coordinate
    Scalar(f64),
    /// Values at each requested coordinate, in order
    Values(Vec<f64>),
}

impl QueryValue {
    /// The single value, if there is exactly one
    pub fn scalar(&self) -> Option<f64> {
        match self {
            QueryValue::Scalar(v) => Some(*v),
            QueryValue::Values(vs) if vs.len() == 1 => Some(vs[0]),
            QueryValue::Values(_) => None,
        }
    }

    pub fn values(&self) -> Vec<f64> {
        match self {
            QueryValue::Scalar(v) => vec![*v],
            QueryValue::Values(vs) => vs.clone(),
        }
    }
}

/// Result functions and reactions produced by one analysis.
///
/// Replaced wholesale on the next analysis and never mutated.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub reactions: Vec<SupportReaction>,
    pub normal_force: Piecewise,
    pub shear_force: Piecewise,
    pub bending_moment: Piecewise,
    pub slope: Piecewise,
    pub deflection: Piecewise,
    pub axial_deflection: Piecewise,
}

impl AnalysisResult {
    pub fn function(&self, quantity: Quantity) -> &Piecewise {
        match quantity {
            Quantity::NormalForce => &self.normal_force,
            Quantity::ShearForce => &self.shear_force,
            Quantity::BendingMoment => &self.bending_moment,
            Quantity::Slope => &self.slope,
            Quantity::Deflection => &self.deflection,
            Quantity::AxialDeflection => &self.axial_deflection,
        }
    }

    pub fn reaction(&self, position: f64) -> Option<Reactions> {
        self.reactions
            .iter()
            .find(|r| r.position == position)
            .map(|r| r.reactions)
    }
}

/// Sampled result function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Curve {
    pub quantity: Quantity,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Rounded extrema over the span
    pub max: f64,
    pub min: f64,
}

/// Value of a result function at a query coordinate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueryAnnotation {
    pub quantity: Quantity,
    pub x: f64,
    pub value: f64,
}

/// Everything a front end needs to render an analysed beam
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamReport {
    pub span: f64,
    pub section: Section,
    pub supports: Vec<Support>,
    pub loads: Vec<Load>,
    pub reactions: Vec<SupportReaction>,
    pub curves: Vec<Curve>,
    pub annotations: Vec<QueryAnnotation>,
}

impl BeamReport {
    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> BeamResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn curve(&self, quantity: Quantity) -> Option<&Curve> {
        self.curves.iter().find(|c| c.quantity == quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_value_scalar() {
        assert_eq!(QueryValue::Scalar(2.0).scalar(), Some(2.0));
        assert_eq!(QueryValue::Values(vec![1.0]).scalar(), Some(1.0));
        assert_eq!(QueryValue::Values(vec![1.0, 2.0]).scalar(), None);
        assert_eq!(QueryValue::Scalar(3.0).values(), vec![3.0]);
    }

    #[test]
    fn test_support_reaction_serializes_flat() {
        let r = SupportReaction {
            position: 5.0,
            reactions: Reactions::new(0.0, 5.0, 0.0),
        };
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["position"], 5.0);
        assert_eq!(json["transverse"], 5.0);
        assert_eq!(Reactions::new(3.0, 4.0, 0.0).force_magnitude(), 5.0);
    }
}
