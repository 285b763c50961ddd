//! Random Graph Generators
//!
//! Three supported families: uniform random (Erdős–Rényi), small-world
//! rewiring (Watts–Strogatz), and preferential attachment
//! (Barabási–Albert). All three are deterministic given identical seed
//! and parameters, which the test fixtures rely on.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Topology;
use crate::error::SimError;

/// A topology family plus its family-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologyKind {
    /// G(n,p): an independent coin flip per unordered node pair.
    UniformRandom { edge_probability: f64 },
    /// Ring lattice with `neighbours` links per node, then stochastic
    /// rewiring of each lattice edge.
    SmallWorld {
        neighbours: u32,
        rewire_probability: f64,
    },
    /// Each new node attaches to `attachment` existing nodes chosen
    /// proportionally to their degree.
    PreferentialAttachment { attachment: u32 },
}

impl TopologyKind {
    /// Parameter validation, performed before any construction.
    pub fn validate(&self, node_count: usize) -> Result<(), SimError> {
        match *self {
            TopologyKind::UniformRandom { edge_probability } => {
                if !(0.0..=1.0).contains(&edge_probability) {
                    return Err(SimError::Configuration(format!(
                        "edge probability {edge_probability} out of range [0, 1]"
                    )));
                }
            }
            TopologyKind::SmallWorld {
                neighbours,
                rewire_probability,
            } => {
                if neighbours < 2 || neighbours as usize >= node_count {
                    return Err(SimError::Configuration(format!(
                        "neighbour count {neighbours} must be >= 2 and < node count {node_count}"
                    )));
                }
                if !(0.0..=1.0).contains(&rewire_probability) {
                    return Err(SimError::Configuration(format!(
                        "rewire probability {rewire_probability} out of range [0, 1]"
                    )));
                }
            }
            TopologyKind::PreferentialAttachment { attachment } => {
                if attachment < 1 || attachment as usize >= node_count {
                    return Err(SimError::Configuration(format!(
                        "attachment degree {attachment} must be >= 1 and < node count {node_count}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Builds a graph of the requested family. Deterministic given identical
/// seed and parameters.
pub fn create_topology(
    kind: TopologyKind,
    node_count: usize,
    seed: u64,
) -> Result<Topology, SimError> {
    if node_count == 0 {
        return Err(SimError::Configuration(
            "node count must be positive".to_string(),
        ));
    }
    kind.validate(node_count)?;

    let mut rng = SmallRng::seed_from_u64(seed);
    let topology = match kind {
        TopologyKind::UniformRandom { edge_probability } => {
            uniform_random(node_count, edge_probability, &mut rng)
        }
        TopologyKind::SmallWorld {
            neighbours,
            rewire_probability,
        } => small_world(node_count, neighbours, rewire_probability, &mut rng),
        TopologyKind::PreferentialAttachment { attachment } => {
            preferential_attachment(node_count, attachment, &mut rng)
        }
    };
    tracing::debug!(
        ?kind,
        nodes = topology.node_count(),
        edges = topology.edge_count(),
        "topology generated"
    );
    Ok(topology)
}

fn uniform_random(n: usize, p: f64, rng: &mut SmallRng) -> Topology {
    let mut topology = Topology::with_nodes(n);
    for a in 0..n as u32 {
        for b in (a + 1)..n as u32 {
            if rng.gen::<f64>() < p {
                topology.add_edge(a, b);
            }
        }
    }
    topology
}

fn small_world(n: usize, k: u32, beta: f64, rng: &mut SmallRng) -> Topology {
    let mut topology = Topology::with_nodes(n);
    let half = k / 2;

    // Ring lattice: each node linked to its `half` nearest neighbors on
    // either side.
    for offset in 1..=half {
        for node in 0..n as u32 {
            topology.add_edge(node, (node + offset) % n as u32);
        }
    }

    // Rewire each lattice edge (u, u+offset) with probability beta,
    // redrawing the new endpoint until it is neither u itself nor an
    // existing neighbor. Nodes one short of full degree keep their edge.
    for offset in 1..=half {
        for u in 0..n as u32 {
            if rng.gen::<f64>() >= beta {
                continue;
            }
            let mut w = rng.gen_range(0..n as u32);
            while w == u || topology.has_edge(u, w) {
                if topology.degree(u) >= n - 1 {
                    break;
                }
                w = rng.gen_range(0..n as u32);
            }
            if w == u || topology.has_edge(u, w) {
                continue;
            }
            topology.remove_edge(u, (u + offset) % n as u32);
            topology.add_edge(u, w);
        }
    }
    topology
}

fn preferential_attachment(n: usize, m: u32, rng: &mut SmallRng) -> Topology {
    let mut topology = Topology::with_nodes(n);
    // Endpoint list where each node appears once per incident edge, so a
    // uniform draw is degree-proportional.
    let mut repeated: Vec<u32> = Vec::new();
    let mut targets: Vec<u32> = (0..m).collect();

    for node in m..n as u32 {
        for &target in &targets {
            topology.add_edge(node, target);
        }
        repeated.extend(targets.iter().copied());
        repeated.extend(std::iter::repeat(node).take(m as usize));
        targets = distinct_sample(&repeated, m as usize, rng);
    }
    topology
}

/// Draws `count` distinct values from the endpoint list, degree biased.
fn distinct_sample(pool: &[u32], count: usize, rng: &mut SmallRng) -> Vec<u32> {
    let mut picked = BTreeSet::new();
    while picked.len() < count {
        picked.insert(pool[rng.gen_range(0..pool.len())]);
    }
    picked.into_iter().collect()
}
