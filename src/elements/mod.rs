//! Beam section and support elements

mod section;
mod support;

pub use section::Section;
pub use support::{Channel, Restraint, Support};
