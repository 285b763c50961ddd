//! Local Consensus Process
//!
//! Pairwise certainty diffusion across every edge, independent of any
//! message activity. For each directed adjacency where one endpoint is
//! more confident (lower uncertainty) than the other, the unsure agent is
//! pulled toward, snapped to, or pushed away from the confident one
//! depending on their alignments. Runs once per cascade step over the
//! whole graph, sequentially and in place.

use bevy_ecs::prelude::*;

use crate::components::agent::{Alignment, Uncertainty};
use crate::setup::AgentIndex;
use crate::topology::Topology;

/// Fraction of the uncertainty gap transferred in one pass, keyed by the
/// tier pair (unsure agent first, confident agent second).
fn pull_fraction(u2: f64, u1: f64) -> f64 {
    if u2 >= 0.0 {
        if u1 >= 0.0 {
            1.0 / 5.0
        } else if u1 > -0.5 {
            1.0 / 4.0
        } else {
            1.0 / 3.0
        }
    } else if u2 > -0.5 {
        if u1 > -0.5 {
            1.0 / 10.0
        } else {
            1.0 / 5.0
        }
    } else {
        1.0 / 10.0
    }
}

/// Resolves one confident-to-unsure adjacency. Returns the unsure
/// agent's new (alignment, uncertainty).
pub(crate) fn consensus_outcome(
    a1: Alignment,
    u1: f64,
    a2: Alignment,
    u2: f64,
) -> (Alignment, f64) {
    let fraction = pull_fraction(u2, u1);
    if a1 == a2 {
        (a2, u2 - (u2 - u1) * fraction)
    } else if a2 == Alignment::Neutral {
        // Adoption: the neutral agent joins the confident neighbor
        (a1, 0.5)
    } else {
        // Opposing factions repel; overshooting past 1.0 reflects the
        // agent into the other camp rather than clamping
        let pushed = u2 + (u2 - u1) * fraction;
        if pushed > 1.0 {
            (a2.switched(), 2.0 - pushed)
        } else {
            (a2, pushed)
        }
    }
}

/// System: one consensus pass over every directed adjacency, in
/// ascending node order.
pub fn local_consensus(
    topology: Res<Topology>,
    index: Res<AgentIndex>,
    mut agents: Query<(&mut Alignment, &mut Uncertainty)>,
) {
    for node in 0..topology.node_count() as u32 {
        for &neighbor in topology.neighbors(node) {
            let Some(confident_entity) = index.get(node) else {
                continue;
            };
            let Some(unsure_entity) = index.get(neighbor) else {
                continue;
            };
            let (a1, u1) = {
                let Ok((alignment, uncertainty)) = agents.get(confident_entity) else {
                    continue;
                };
                (*alignment, uncertainty.0)
            };
            let (a2, u2) = {
                let Ok((alignment, uncertainty)) = agents.get(unsure_entity) else {
                    continue;
                };
                (*alignment, uncertainty.0)
            };
            if u1 >= u2 {
                continue;
            }
            let (new_alignment, new_uncertainty) = consensus_outcome(a1, u1, a2, u2);
            if let Ok((mut alignment, mut uncertainty)) = agents.get_mut(unsure_entity) {
                *alignment = new_alignment;
                uncertainty.0 = new_uncertainty;
            }
        }
    }
}
