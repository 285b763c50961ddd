//! Cascade Engine
//!
//! Stochastic message propagation along graph edges. Each step, every
//! active message tries to jump from its wavefront to adjacent agents;
//! successful exposures run the belief-revision rule and seed the next
//! wavefront, which is always built into a fresh set so the current one
//! is never mutated while traversed.

use bevy_ecs::prelude::*;
use rand::Rng;
use std::collections::BTreeSet;

use crate::components::agent::{Alienated, Alignment, Susceptibility, Team, Uncertainty};
use crate::components::message::ActiveMessages;
use crate::setup::AgentIndex;
use crate::systems::opinion;
use crate::topology::Topology;
use crate::SimRng;

/// Influence probability reduction when the target's alignment opposes
/// the message's faction.
const OPPOSED_ALIGNMENT_FACTOR: f64 = 0.8;

/// Resource: cascade tuning parameters.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CascadeParams {
    /// Base probability of influence per exposure attempt.
    pub base_influence_rate: f64,
}

/// System: one propagation step for every active message.
///
/// A neighbor is skipped when it is already carrying the message this
/// step (current or next wavefront) or when it is alienated and the
/// message is Red. Exposure alone advances the wavefront, whether or not
/// the agent's alignment actually moved.
pub fn spread_active_messages(
    mut messages: ResMut<ActiveMessages>,
    params: Res<CascadeParams>,
    topology: Res<Topology>,
    index: Res<AgentIndex>,
    mut rng: ResMut<SimRng>,
    mut agents: Query<(
        &Susceptibility,
        &mut Alignment,
        &mut Uncertainty,
        &mut Alienated,
    )>,
) {
    for message in messages.0.iter_mut() {
        if message.steps_remaining == 0 {
            continue;
        }

        let mut next_wave: BTreeSet<u32> = BTreeSet::new();
        for &node in message.active_nodes.iter() {
            for &neighbor in topology.neighbors(node) {
                if message.active_nodes.contains(&neighbor) || next_wave.contains(&neighbor) {
                    continue;
                }
                let Some(entity) = index.get(neighbor) else {
                    continue;
                };
                let Ok((susceptibility, alignment, uncertainty, alienated)) = agents.get(entity)
                else {
                    continue;
                };
                if alienated.0 && message.team == Team::Red {
                    continue;
                }

                let mut probability =
                    params.base_influence_rate * message.potency * susceptibility.0;
                if !alignment.is_team(message.team) {
                    probability *= OPPOSED_ALIGNMENT_FACTOR;
                }
                let (current_alignment, current_uncertainty) = (*alignment, uncertainty.0);

                if rng.0.gen::<f64>() < probability {
                    let outcome = opinion::expose(
                        current_alignment,
                        current_uncertainty,
                        message.team,
                        message.potency,
                    );
                    if let Ok((_, mut alignment, mut uncertainty, mut alienated)) =
                        agents.get_mut(entity)
                    {
                        if outcome.alignment != current_alignment {
                            tracing::debug!(
                                node = neighbor,
                                from = %current_alignment,
                                to = %outcome.alignment,
                                "agent influenced"
                            );
                        }
                        *alignment = outcome.alignment;
                        uncertainty.0 = outcome.uncertainty;
                        if outcome.alienated {
                            alienated.0 = true;
                        }
                    }
                    next_wave.insert(neighbor);
                }
            }
        }

        tracing::debug!(
            team = %message.team,
            wavefront = next_wave.len(),
            steps_remaining = message.steps_remaining - 1,
            "message propagated"
        );
        message.active_nodes = next_wave;
        message.steps_remaining -= 1;
    }

    // Exhausted messages leave the active set
    messages.0.retain(|m| m.steps_remaining > 0);
}
