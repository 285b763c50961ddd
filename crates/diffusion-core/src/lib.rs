//! Competitive Opinion Diffusion Engine
//!
//! Two factions, Red and Blue, take turns injecting messages into a
//! random graph of agents. Messages cascade stochastically along edges,
//! each exposed agent revises its belief state through a nonlinear tier
//! rule, and a separate local consensus pass homogenizes certainty
//! between neighbors on every step regardless of message activity.
//!
//! Public API for embedding the engine; the `diffusion_sim` binary is a
//! thin headless driver over the same surface.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod error;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;
pub mod topology;

pub use components::*;
pub use config::SimulationConfig;
pub use error::SimError;
pub use simulation::{Simulation, SimulationState, TerminationReason};
pub use topology::{create_topology, Topology, TopologyKind};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
