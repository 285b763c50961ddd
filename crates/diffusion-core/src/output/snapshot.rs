//! Graph Snapshot Building
//!
//! Serializes the live world into the shared snapshot types, iterating
//! agents in ascending node-id order so identical states produce
//! identical output.

use bevy_ecs::prelude::*;

use diffusion_output::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};

use crate::components::agent::{Alienated, Alignment, Susceptibility, Uncertainty};
use crate::setup::AgentIndex;
use crate::topology::Topology;

/// Captures the complete graph state.
pub fn graph_snapshot(world: &World) -> GraphSnapshot {
    let index = world.resource::<AgentIndex>();
    let topology = world.resource::<Topology>();

    let mut nodes = Vec::with_capacity(index.len());
    for (id, entity) in index.iter() {
        let Some(alignment) = world.get::<Alignment>(entity) else {
            continue;
        };
        let Some(susceptibility) = world.get::<Susceptibility>(entity) else {
            continue;
        };
        let Some(uncertainty) = world.get::<Uncertainty>(entity) else {
            continue;
        };
        let Some(alienated) = world.get::<Alienated>(entity) else {
            continue;
        };
        nodes.push(NodeSnapshot {
            id,
            alignment: alignment.to_string(),
            susceptibility: susceptibility.0,
            uncertainty: uncertainty.0,
            alienated: alienated.0,
        });
    }

    let edges = topology
        .edges()
        .iter()
        .map(|&(from, to)| EdgeSnapshot { from, to })
        .collect();

    GraphSnapshot { nodes, edges }
}
