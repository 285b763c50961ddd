//! Configuration
//!
//! Simulation parameters with defaults matching the reference setup,
//! loadable from a TOML file for adjustment without recompiling. All
//! validation happens here, before any simulation state exists.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SimError;
use crate::setup::InitialBeliefs;
use crate::topology::TopologyKind;

/// Complete parameter set for one simulation instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of agents in the graph
    pub num_nodes: usize,
    /// Topology family and its parameters
    pub topology: TopologyKind,
    /// Seed for both topology generation and the simulation stream
    pub seed: u64,
    /// Start agents on random factions instead of Neutral
    pub randomized_start: bool,
    /// Neutral starting uncertainty
    pub initial_uncertainty: f64,
    /// Half-width of the uncertainty range under `randomized_start`
    pub uncertainty_range: f64,
    /// Fraction of the population activated as message sources
    pub source_activation_rate: f64,
    /// Base influence probability per exposure attempt
    pub base_influence_rate: f64,
    /// Number of turns before the run finishes
    pub num_turns: u32,
    /// Cascade steps per turn
    pub steps_per_turn: u32,
    /// Blue faction's starting energy pool
    pub initial_blue_energy: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_nodes: 50,
            topology: TopologyKind::SmallWorld {
                neighbours: 4,
                rewire_probability: 0.1,
            },
            seed: 42,
            randomized_start: false,
            initial_uncertainty: 2.0,
            uncertainty_range: 2.0,
            source_activation_rate: 0.1,
            base_influence_rate: 0.5,
            num_turns: 40,
            steps_per_turn: 2,
            initial_blue_energy: 70.0,
        }
    }
}

impl SimulationConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SimError::Configuration(format!("cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, SimError> {
        toml::from_str(content).map_err(|e| SimError::Configuration(e.to_string()))
    }

    /// Rejects out-of-range parameters before any state is built.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.num_nodes == 0 {
            return Err(SimError::Configuration(
                "node count must be positive".to_string(),
            ));
        }
        self.topology.validate(self.num_nodes)?;
        if !(0.0..=1.0).contains(&self.source_activation_rate) {
            return Err(SimError::Configuration(format!(
                "source activation rate {} out of range [0, 1]",
                self.source_activation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.base_influence_rate) {
            return Err(SimError::Configuration(format!(
                "base influence rate {} out of range [0, 1]",
                self.base_influence_rate
            )));
        }
        if self.num_turns == 0 {
            return Err(SimError::Configuration(
                "turn count must be positive".to_string(),
            ));
        }
        if self.steps_per_turn == 0 {
            return Err(SimError::Configuration(
                "steps per turn must be positive".to_string(),
            ));
        }
        if self.uncertainty_range < 0.0 {
            return Err(SimError::Configuration(format!(
                "uncertainty range {} must not be negative",
                self.uncertainty_range
            )));
        }
        Ok(())
    }

    /// Initial belief-distribution parameters for the agent initializer.
    pub fn initial_beliefs(&self) -> InitialBeliefs {
        InitialBeliefs {
            randomized_start: self.randomized_start,
            initial_uncertainty: self.initial_uncertainty,
            uncertainty_range: self.uncertainty_range,
        }
    }

    /// Total step budget for a full run.
    pub fn total_steps(&self) -> u64 {
        self.num_turns as u64 * self.steps_per_turn as u64
    }
}
