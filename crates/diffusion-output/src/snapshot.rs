//! Snapshot Types
//!
//! Serialization structs for the full graph state at a point in time.
//! A snapshot captures every agent's belief attributes plus the (static)
//! edge list, and is what the engine hands to visualization or export
//! layers after each step.

use serde::{Deserialize, Serialize};

/// One agent's serialized state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: u32,
    /// "Red", "Blue" or "Neutral"
    pub alignment: String,
    pub susceptibility: f64,
    pub uncertainty: f64,
    pub alienated: bool,
}

/// An undirected connection, serialized once per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub from: u32,
    pub to: u32,
}

/// Complete graph state: every agent plus the edge list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    /// Serializes the snapshot to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
