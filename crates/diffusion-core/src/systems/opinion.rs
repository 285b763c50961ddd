//! Belief-Revision Rule
//!
//! How one agent's (alignment, uncertainty) pair reacts to direct message
//! exposure. Pure functions over the inputs so every tier is unit
//! testable; the cascade engine applies the returned outcome in place.
//!
//! The two factions are deliberately asymmetric on opposing-alignment
//! exposure: a Red message can only alienate a non-Red agent, while a
//! Blue message walks the full revision table and may flip alignment
//! outright.

use crate::components::agent::{Alignment, Team};

/// A Red message alienates an opposing agent when
/// `uncertainty * potency * 10` falls to this value or below. A potency
/// of 0.1 can only alienate an agent at uncertainty -1.0; a potency of
/// 1.0 alienates anything below -0.1.
const ALIENATION_THRESHOLD: f64 = -1.0;

/// Outcome of exposing one agent to a message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exposure {
    pub alignment: Alignment,
    pub uncertainty: f64,
    /// True when this exposure trips the one-way alienation flag.
    pub alienated: bool,
}

impl Exposure {
    fn unchanged(alignment: Alignment, uncertainty: f64) -> Self {
        Self {
            alignment,
            uncertainty,
            alienated: false,
        }
    }
}

/// Applies the belief-revision rule for a single exposure.
///
/// `u` is the agent's current uncertainty, `q` the message potency in
/// (0,1]. Uncertainty outputs are intentionally not clamped to [-1,1];
/// transient excursions are part of the dynamics.
pub fn expose(alignment: Alignment, u: f64, team: Team, q: f64) -> Exposure {
    if alignment.is_team(team) {
        return reinforce(alignment, u, q);
    }
    match team {
        Team::Red => {
            // Opposing or neutral agents are never converted directly;
            // pushing on a firmly convinced opponent backfires instead.
            if u * q * 10.0 <= ALIENATION_THRESHOLD {
                Exposure {
                    alignment,
                    uncertainty: u,
                    alienated: true,
                }
            } else {
                Exposure::unchanged(alignment, u)
            }
        }
        Team::Blue => convert(alignment, u, q),
    }
}

/// An agent hears its own faction: alignment never changes, uncertainty
/// tightens (or, for overconfident potent messaging, relaxes) by tier.
fn reinforce(alignment: Alignment, u: f64, q: f64) -> Exposure {
    let uncertainty = if u >= 0.0 {
        if q >= 0.5 {
            (5.0 - q * 10.0 + u * 5.0) / 10.0
        } else {
            u - 2.0 * q / 5.0
        }
    } else if u > -0.5 {
        u - q / 3.0
    } else {
        // Near-certain agents barely move further
        u - ((10.0 * q) / (30.0 * -u) - 0.34).max(0.0)
    };
    Exposure::unchanged(alignment, uncertainty)
}

/// A Blue message reaches a non-Blue agent.
fn convert(alignment: Alignment, u: f64, q: f64) -> Exposure {
    if alignment == Alignment::Neutral {
        return Exposure::unchanged(Alignment::Blue, 0.5);
    }
    if u >= 0.0 {
        if q >= 0.5 {
            Exposure::unchanged(alignment.switched(), (9.0 - q * 10.0 - u * 2.0) / 10.0)
        } else if u + q > 1.0 {
            Exposure::unchanged(alignment.switched(), 2.0 - (u + q))
        } else {
            Exposure::unchanged(alignment, u)
        }
    } else if u > -0.5 {
        Exposure::unchanged(alignment, u + q / 2.0)
    } else {
        // The closer to -1.0, the harder the agent resists
        Exposure::unchanged(alignment, u + (10.0 * q) / (100.0 * -u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_neutral_adopts_blue() {
        let out = expose(Alignment::Neutral, 2.0, Team::Blue, 0.1);
        assert_eq!(out.alignment, Alignment::Blue);
        assert_eq!(out.uncertainty, 0.5);
        assert!(!out.alienated);

        // Potency does not matter for neutral adoption
        let out = expose(Alignment::Neutral, 2.0, Team::Blue, 1.0);
        assert_eq!(out.alignment, Alignment::Blue);
        assert_eq!(out.uncertainty, 0.5);
    }

    #[test]
    fn test_red_never_converts_directly() {
        let out = expose(Alignment::Neutral, 2.0, Team::Red, 1.0);
        assert_eq!(out.alignment, Alignment::Neutral);
        assert_eq!(out.uncertainty, 2.0);
        assert!(!out.alienated);

        let out = expose(Alignment::Blue, 0.3, Team::Red, 0.9);
        assert_eq!(out.alignment, Alignment::Blue);
        assert_eq!(out.uncertainty, 0.3);
        assert!(!out.alienated);
    }

    #[test]
    fn test_red_alienates_convinced_opponents() {
        // -0.6 * 0.5 * 10 = -3.0 <= -1
        let out = expose(Alignment::Blue, -0.6, Team::Red, 0.5);
        assert!(out.alienated);
        assert_eq!(out.alignment, Alignment::Blue);
        assert_eq!(out.uncertainty, -0.6);

        // -0.05 * 0.5 * 10 = -0.25 > -1: no alienation
        let out = expose(Alignment::Blue, -0.05, Team::Red, 0.5);
        assert!(!out.alienated);

        // Boundary: -1.0 * 0.1 * 10 = -1.0, inclusive
        let out = expose(Alignment::Blue, -1.0, Team::Red, 0.1);
        assert!(out.alienated);
    }

    #[test]
    fn test_reinforce_unsure_potent() {
        // U >= 0, Q >= 0.5: (5 - 10Q + 5U) / 10
        let out = expose(Alignment::Red, 0.4, Team::Red, 0.8);
        assert_eq!(out.alignment, Alignment::Red);
        assert!((out.uncertainty - (5.0 - 8.0 + 2.0) / 10.0).abs() < EPS);
    }

    #[test]
    fn test_reinforce_unsure_weak() {
        // U >= 0, Q < 0.5: U - 2Q/5
        let out = expose(Alignment::Blue, 0.4, Team::Blue, 0.4);
        assert!((out.uncertainty - (0.4 - 0.16)).abs() < EPS);
    }

    #[test]
    fn test_reinforce_confident() {
        // -0.5 < U < 0: U - Q/3
        let out = expose(Alignment::Red, -0.3, Team::Red, 0.6);
        assert!((out.uncertainty - (-0.3 - 0.2)).abs() < EPS);
    }

    #[test]
    fn test_reinforce_near_certain_saturates() {
        // U <= -0.5: U - max(10Q/(30*(-U)) - 0.34, 0)
        let out = expose(Alignment::Red, -1.0, Team::Red, 0.9);
        let expected = -1.0 - (9.0 / 30.0 - 0.34f64).max(0.0);
        assert!((out.uncertainty - expected).abs() < EPS);
        // 9/30 - 0.34 < 0, so a near-certain agent does not move at all
        assert_eq!(out.uncertainty, -1.0);

        let out = expose(Alignment::Red, -0.5, Team::Red, 1.0);
        let expected = -0.5 - (10.0 / 15.0 - 0.34);
        assert!((out.uncertainty - expected).abs() < EPS);
    }

    #[test]
    fn test_blue_flips_unsure_opponent_with_potent_message() {
        // U >= 0, Q >= 0.5: flip, (9 - 10Q - 2U)/10
        let out = expose(Alignment::Red, 0.5, Team::Blue, 0.8);
        assert_eq!(out.alignment, Alignment::Blue);
        assert!((out.uncertainty - (9.0 - 8.0 - 1.0) / 10.0).abs() < EPS);
    }

    #[test]
    fn test_blue_flips_very_unsure_opponent_with_weak_message() {
        // U >= 0, Q < 0.5, U + Q > 1: flip, 2 - (U + Q)
        let out = expose(Alignment::Red, 0.8, Team::Blue, 0.4);
        assert_eq!(out.alignment, Alignment::Blue);
        assert!((out.uncertainty - (2.0 - 1.2)).abs() < EPS);

        // U + Q <= 1: nothing happens
        let out = expose(Alignment::Red, 0.3, Team::Blue, 0.4);
        assert_eq!(out.alignment, Alignment::Red);
        assert_eq!(out.uncertainty, 0.3);
    }

    #[test]
    fn test_blue_unsettles_confident_opponent() {
        // -0.5 < U < 0: U + Q/2
        let out = expose(Alignment::Red, -0.4, Team::Blue, 0.6);
        assert_eq!(out.alignment, Alignment::Red);
        assert!((out.uncertainty - (-0.4 + 0.3)).abs() < EPS);
    }

    #[test]
    fn test_blue_barely_moves_near_certain_opponent() {
        // U <= -0.5: U + 10Q/(100*(-U))
        let out = expose(Alignment::Red, -0.8, Team::Blue, 0.5);
        assert_eq!(out.alignment, Alignment::Red);
        assert!((out.uncertainty - (-0.8 + 5.0 / 80.0)).abs() < EPS);
    }

    #[test]
    fn test_faction_asymmetry_on_opposing_exposure() {
        // Same agent, same potency: Blue flips it, Red leaves it alone
        let blue = expose(Alignment::Red, 0.5, Team::Blue, 0.8);
        assert_eq!(blue.alignment, Alignment::Blue);

        let red = expose(Alignment::Blue, 0.5, Team::Red, 0.8);
        assert_eq!(red.alignment, Alignment::Blue);
        assert_eq!(red.uncertainty, 0.5);
        assert!(!red.alienated);
    }
}
