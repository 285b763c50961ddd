//! Stats and Step-Report Types
//!
//! Per-step population counts, the live stats view, and the report a
//! single simulation step returns to its caller.

use serde::{Deserialize, Serialize};

use crate::snapshot::GraphSnapshot;

/// Population counts sampled after one cascade step.
///
/// `red_change` / `blue_change` are believers gained (positive) or lost
/// (negative) since the previous entry in the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub red: usize,
    pub blue: usize,
    pub neutral: usize,
    pub alienated: usize,
    #[serde(default)]
    pub red_change: i64,
    #[serde(default)]
    pub blue_change: i64,
}

/// Live statistics view over the current simulation state.
///
/// The `current_*` fields describe the most recently introduced message
/// and are `None` before the first turn starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub current_team: Option<String>,
    pub current_message_content: Option<String>,
    pub current_potency: Option<f64>,
    pub red_count: usize,
    pub red_pct: f64,
    pub blue_count: usize,
    pub blue_pct: f64,
    pub neutral_count: usize,
    pub neutral_pct: f64,
    pub alienated_count: usize,
    pub alienated_pct: f64,
    pub blue_energy: f64,
}

/// Whether the turn budget still has steps left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Running,
    Finished,
}

/// Result of advancing the simulation by one cascade step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub status: StepStatus,
    pub snapshot: GraphSnapshot,
    pub step_index: u64,
}

impl StepReport {
    pub fn is_finished(&self) -> bool {
        self.status == StepStatus::Finished
    }
}
