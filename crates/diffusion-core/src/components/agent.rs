//! Agent Components
//!
//! The fixed-shape belief record every graph node carries: faction
//! alignment, susceptibility, uncertainty, and the alienation flag.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SimError;

/// One of the two competing factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// The other faction.
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// The alignment an agent holds when it believes this faction.
    pub fn alignment(self) -> Alignment {
        match self {
            Team::Red => Alignment::Red,
            Team::Blue => Alignment::Blue,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Red => write!(f, "Red"),
            Team::Blue => write!(f, "Blue"),
        }
    }
}

impl FromStr for Team {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Team::Red),
            "blue" => Ok(Team::Blue),
            _ => Err(SimError::InvalidTeam(s.to_string())),
        }
    }
}

/// Component: an agent's current faction membership.
///
/// Exactly one variant holds at any time; there is no "between factions"
/// state and no way to hold two memberships.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Red,
    Blue,
    Neutral,
}

impl Alignment {
    /// True when the agent already believes the given faction.
    pub fn is_team(self, team: Team) -> bool {
        self == team.alignment()
    }

    /// Red and Blue swap; anything else lands on Blue. Only ever applied
    /// to agents that already hold a faction.
    pub fn switched(self) -> Alignment {
        match self {
            Alignment::Blue => Alignment::Red,
            _ => Alignment::Blue,
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alignment::Red => write!(f, "Red"),
            Alignment::Blue => write!(f, "Blue"),
            Alignment::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Component: stable node identifier, also the index into the adjacency
/// table.
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub u32);

/// Component: exposure-to-influence probability factor in [0,1], drawn
/// once at creation and never changed by the dynamics.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Susceptibility(pub f64);

/// Component: continuous belief-confidence score.
///
/// Negative = confident, positive = unsure. The nominal operating band is
/// [-1, +1] but the arithmetic is deliberately unclamped; the Neutral
/// starting value 2.0 is a "very unsure" sentinel outside the band.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Uncertainty(pub f64);

/// Component: one-way flag. Once set, the agent refuses all further Red
/// cascade exposure. Never cleared except by a full re-initialization.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Alienated(pub bool);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_opponent() {
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Blue.opponent(), Team::Red);
    }

    #[test]
    fn test_team_parse() {
        assert_eq!("red".parse::<Team>().unwrap(), Team::Red);
        assert_eq!("Blue".parse::<Team>().unwrap(), Team::Blue);
        assert!("green".parse::<Team>().is_err());
        assert!("".parse::<Team>().is_err());
    }

    #[test]
    fn test_alignment_switched() {
        assert_eq!(Alignment::Red.switched(), Alignment::Blue);
        assert_eq!(Alignment::Blue.switched(), Alignment::Red);
    }

    #[test]
    fn test_alignment_is_team() {
        assert!(Alignment::Red.is_team(Team::Red));
        assert!(!Alignment::Neutral.is_team(Team::Red));
        assert!(!Alignment::Blue.is_team(Team::Red));
    }
}
