//! Agent Graph
//!
//! Storage for the undirected agent graph and the random generators that
//! build it.

pub mod generate;

pub use generate::{create_topology, TopologyKind};

use bevy_ecs::prelude::*;

/// Resource: simple undirected graph over the agent population.
///
/// Adjacency is stored as per-node neighbor lists indexed by stable node
/// id, with a parallel edge list kept for snapshot serialization. Self
/// loops and duplicate edges are rejected at insertion.
#[derive(Resource, Debug, Clone, Default)]
pub struct Topology {
    node_count: usize,
    adjacency: Vec<Vec<u32>>,
    edges: Vec<(u32, u32)>,
}

impl Topology {
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            node_count,
            adjacency: vec![Vec::new(); node_count],
            edges: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Adds an undirected edge. Returns false (and changes nothing) for
    /// self-loops, out-of-range endpoints, and duplicates.
    pub fn add_edge(&mut self, a: u32, b: u32) -> bool {
        if a == b || a as usize >= self.node_count || b as usize >= self.node_count {
            return false;
        }
        if self.has_edge(a, b) {
            return false;
        }
        self.adjacency[a as usize].push(b);
        self.adjacency[b as usize].push(a);
        self.edges.push((a.min(b), a.max(b)));
        true
    }

    /// Removes an undirected edge if present.
    pub fn remove_edge(&mut self, a: u32, b: u32) -> bool {
        if !self.has_edge(a, b) {
            return false;
        }
        self.adjacency[a as usize].retain(|&n| n != b);
        self.adjacency[b as usize].retain(|&n| n != a);
        let key = (a.min(b), a.max(b));
        self.edges.retain(|&e| e != key);
        true
    }

    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        self.adjacency
            .get(a as usize)
            .map(|ns| ns.contains(&b))
            .unwrap_or(false)
    }

    /// Neighbors of a node, in insertion order.
    pub fn neighbors(&self, node: u32) -> &[u32] {
        self.adjacency
            .get(node as usize)
            .map(|ns| ns.as_slice())
            .unwrap_or(&[])
    }

    pub fn degree(&self, node: u32) -> usize {
        self.neighbors(node).len()
    }

    /// All edges as (low, high) pairs, in insertion order.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }
}
