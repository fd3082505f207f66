//! Support conditions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, BeamError, BeamResult};

/// Direction a support acts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Translation along the beam axis
    Axial,
    /// Translation perpendicular to the beam
    Transverse,
    /// Rotation in the plane of bending
    Rotational,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Axial => "axial",
            Channel::Transverse => "transverse",
            Channel::Rotational => "rotational",
        };
        write!(f, "{}", name)
    }
}

/// Restraint state of one support channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Restraint {
    /// Displacement is zero, reaction unknown
    Fixed,
    /// No reaction
    Free,
    /// Elastic, reaction = -k * displacement
    Spring(f64),
}

impl Restraint {
    /// Whether the channel carries an unknown reaction
    pub fn is_reactive(&self) -> bool {
        !matches!(self, Restraint::Free)
    }

    /// Finite stiffness for elastic channels
    pub fn stiffness(&self) -> Option<f64> {
        match self {
            Restraint::Spring(k) => Some(*k),
            _ => None,
        }
    }

    /// Classify a raw token: `free`, `rigid`/`fixed`, or a positive stiffness
    pub fn parse(channel: Channel, token: &str) -> BeamResult<Self> {
        let invalid = |reason: &str| BeamError::InvalidRestraint {
            channel: channel.to_string(),
            token: token.to_string(),
            reason: reason.to_string(),
        };
        let restraint = match token.trim().to_ascii_lowercase().as_str() {
            "free" | "0" => Restraint::Free,
            "rigid" | "fixed" | "1" | "inf" => Restraint::Fixed,
            other => {
                let k: f64 = other
                    .parse()
                    .map_err(|_| invalid("expected 'free', 'rigid' or a stiffness"))?;
                if !k.is_finite() || k <= 0.0 {
                    return Err(invalid("stiffness must be a positive finite number"));
                }
                Restraint::Spring(k)
            }
        };
        check_channel(channel, restraint, token)?;
        Ok(restraint)
    }
}

impl FromStr for Restraint {
    type Err = BeamError;

    /// Parse as a translational channel
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Restraint::parse(Channel::Transverse, s)
    }
}

impl fmt::Display for Restraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Restraint::Fixed => write!(f, "rigid"),
            Restraint::Free => write!(f, "free"),
            Restraint::Spring(k) => write!(f, "{}", k),
        }
    }
}

fn check_channel(channel: Channel, restraint: Restraint, token: &str) -> BeamResult<()> {
    if let (Channel::Rotational, Restraint::Spring(_)) = (channel, restraint) {
        return Err(BeamError::InvalidRestraint {
            channel: channel.to_string(),
            token: token.to_string(),
            reason: "rotational springs are not supported".to_string(),
        });
    }
    Ok(())
}

fn check_stiffness(channel: Channel, k: f64) -> BeamResult<Restraint> {
    if !k.is_finite() || k <= 0.0 {
        return Err(BeamError::InvalidRestraint {
            channel: channel.to_string(),
            token: k.to_string(),
            reason: "stiffness must be a positive finite number".to_string(),
        });
    }
    Ok(Restraint::Spring(k))
}

/// A support at a beam coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Support {
    /// Distance from the left end of the beam
    pub position: f64,
    /// Restraint along the beam axis
    pub axial: Restraint,
    /// Restraint perpendicular to the beam
    pub transverse: Restraint,
    /// Restraint against rotation
    pub rotational: Restraint,
}

impl Support {
    /// Create a support from `(axial, transverse, rotational)` fixity flags
    pub fn new(position: f64, fixed: (bool, bool, bool)) -> BeamResult<Self> {
        let flag = |f: bool| if f { Restraint::Fixed } else { Restraint::Free };
        Ok(Self {
            position: ensure_non_negative("coordinate", position)?,
            axial: flag(fixed.0),
            transverse: flag(fixed.1),
            rotational: flag(fixed.2),
        })
    }

    /// Create a support from three raw channel tokens
    pub fn from_tokens(position: f64, tokens: [&str; 3]) -> BeamResult<Self> {
        Ok(Self {
            position: ensure_non_negative("coordinate", position)?,
            axial: Restraint::parse(Channel::Axial, tokens[0])?,
            transverse: Restraint::parse(Channel::Transverse, tokens[1])?,
            rotational: Restraint::parse(Channel::Rotational, tokens[2])?,
        })
    }

    /// Fully fixed support (all channels restrained)
    pub fn fixed(position: f64) -> BeamResult<Self> {
        Self::new(position, (true, true, true))
    }

    /// Pinned support (translations restrained, rotation free)
    pub fn pinned(position: f64) -> BeamResult<Self> {
        Self::new(position, (true, true, false))
    }

    /// Roller support (transverse translation restrained only)
    pub fn roller(position: f64) -> BeamResult<Self> {
        Self::new(position, (false, true, false))
    }

    /// Replace the axial channel with a spring of stiffness `kx`
    pub fn with_kx(mut self, kx: f64) -> BeamResult<Self> {
        self.axial = check_stiffness(Channel::Axial, kx)?;
        Ok(self)
    }

    /// Replace the transverse channel with a spring of stiffness `ky`
    pub fn with_ky(mut self, ky: f64) -> BeamResult<Self> {
        self.transverse = check_stiffness(Channel::Transverse, ky)?;
        Ok(self)
    }

    pub fn restraint(&self, channel: Channel) -> Restraint {
        match channel {
            Channel::Axial => self.axial,
            Channel::Transverse => self.transverse,
            Channel::Rotational => self.rotational,
        }
    }

    /// Number of channels carrying an unknown reaction
    pub fn num_reactions(&self) -> usize {
        [self.axial, self.transverse, self.rotational]
            .iter()
            .filter(|r| r.is_reactive())
            .count()
    }

    pub(crate) fn validate(&self) -> BeamResult<()> {
        check_channel(Channel::Rotational, self.rotational, &self.rotational.to_string())?;
        for (channel, restraint) in [
            (Channel::Axial, self.axial),
            (Channel::Transverse, self.transverse),
        ] {
            if let Restraint::Spring(k) = restraint {
                check_stiffness(channel, k)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Support at {}: axial = {}, transverse = {}, rotational = {}",
            self.position, self.axial, self.transverse, self.rotational
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        let s = Support::from_tokens(2.0, ["rigid", "1500", "free"]).unwrap();
        assert_eq!(s.axial, Restraint::Fixed);
        assert_eq!(s.transverse, Restraint::Spring(1500.0));
        assert_eq!(s.rotational, Restraint::Free);
        assert_eq!(s.num_reactions(), 2);
        assert_eq!(s.transverse.stiffness(), Some(1500.0));
    }

    #[test]
    fn test_invalid_tokens() {
        assert!(matches!(
            Restraint::parse(Channel::Axial, "wobbly"),
            Err(BeamError::InvalidRestraint { .. })
        ));
        assert!(Restraint::parse(Channel::Axial, "-3").is_err());
        assert!(Restraint::parse(Channel::Rotational, "200").is_err());
        assert_eq!(Restraint::parse(Channel::Rotational, "Fixed").unwrap(), Restraint::Fixed);
        assert_eq!("free".parse::<Restraint>().unwrap(), Restraint::Free);
    }

    #[test]
    fn test_spring_overrides_fixity_flag() {
        let s = Support::new(7.5, (false, false, false)).unwrap().with_ky(5.0).unwrap();
        assert_eq!(s.transverse, Restraint::Spring(5.0));
        assert!(Support::roller(1.0).unwrap().with_kx(0.0).is_err());
    }

    #[test]
    fn test_display() {
        let s = Support::pinned(0.0).unwrap();
        assert_eq!(
            s.to_string(),
            "Support at 0: axial = rigid, transverse = rigid, rotational = free"
        );
    }
}
