//! Shared output types for the opinion-diffusion simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for every other crate in the workspace: the engine
//! serializes its state through these types, and any downstream consumer
//! (exporters, dashboards, test harnesses) deserializes them back.

pub mod snapshot;
pub mod stats;

// Re-export snapshot types
pub use snapshot::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};

// Re-export stats and report types
pub use stats::{PopulationCounts, StatsSnapshot, StepReport, StepStatus};
