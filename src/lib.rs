//! Beam Solver - reactions, internal forces and deflections of 1D beams
//!
//! This library analyses a straight beam under arbitrary point forces,
//! point torques and distributed loads, on any combination of rigid, free
//! or elastic supports, including statically indeterminate layouts:
//! - Loads are reduced to Macaulay singularity functions
//! - Equilibrium is augmented with compatibility equations and solved directly
//! - Results are closed-form piecewise functions of the beam coordinate
//!
//! ## Example
//! ```rust
//! use beam_solver::prelude::*;
//!
//! // 5 m beam, E = 200 GPa in kN/m^2, I and A in m^4 and m^2
//! let mut beam = Beam::new(5.0, 200e6, 9.05e-6, 2.3e-3).unwrap();
//!
//! // Pin at the left end, roller at the right end
//! beam.add_supports([Support::pinned(0.0).unwrap(), Support::roller(5.0).unwrap()])
//!     .unwrap();
//!
//! // 10 kN downward at midspan
//! beam.add_loads([PointForce::vertical(-10.0, 2.5).unwrap()]).unwrap();
//!
//! beam.analyse().unwrap();
//!
//! let left = beam.reaction(0.0).unwrap();
//! assert_eq!(left.transverse, 5.0);
//! let m_max = beam.bending_moment(&Query::max()).unwrap();
//! assert_eq!(m_max.scalar(), Some(12.5));
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::AnalysisOptions;
    pub use crate::elements::{Channel, Restraint, Section, Support};
    pub use crate::error::{BeamError, BeamResult};
    pub use crate::loads::{
        DistributedLoad, Load, PointForce, PointTorque, TrapezoidalLoad, Udl,
    };
    pub use crate::model::Beam;
    pub use crate::results::{BeamReport, Quantity, Query, QueryValue, Reactions};
}
