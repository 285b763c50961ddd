//! Population Statistics
//!
//! Per-step population sampling into an ordered history, plus the Blue
//! faction's energy cost model.

use bevy_ecs::prelude::*;

use diffusion_output::PopulationCounts;

use crate::components::agent::{Alienated, Alignment};

/// Blue's resource cost for fielding one message of the given potency.
pub fn energy_lost(potency: f64) -> f64 {
    (10.0 * potency / 3.0).powf(2.1)
}

/// Resource: ordered per-step population history.
///
/// Always starts with the pre-simulation entry (everyone Neutral) so the
/// first sampled step has a baseline to diff against.
#[derive(Resource, Debug, Default)]
pub struct StatsHistory {
    entries: Vec<PopulationCounts>,
}

impl StatsHistory {
    pub fn with_initial(node_count: usize) -> Self {
        Self {
            entries: vec![PopulationCounts {
                neutral: node_count,
                ..PopulationCounts::default()
            }],
        }
    }

    pub fn reset(&mut self, node_count: usize) {
        self.entries.clear();
        self.entries.push(PopulationCounts {
            neutral: node_count,
            ..PopulationCounts::default()
        });
    }

    pub fn push(&mut self, entry: PopulationCounts) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[PopulationCounts] {
        &self.entries
    }

    pub fn last(&self) -> Option<&PopulationCounts> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// System: counts the population by alignment and alienation after a
/// cascade step and appends the entry to the history.
pub fn sample_population(
    mut history: ResMut<StatsHistory>,
    agents: Query<(&Alignment, &Alienated)>,
) {
    let mut total = 0usize;
    let mut red = 0usize;
    let mut blue = 0usize;
    let mut alienated = 0usize;
    for (alignment, flag) in agents.iter() {
        total += 1;
        match alignment {
            Alignment::Red => red += 1,
            Alignment::Blue => blue += 1,
            Alignment::Neutral => {}
        }
        if flag.0 {
            alienated += 1;
        }
    }
    let neutral = total - red - blue;

    // Deltas only once there is a sampled step to diff against; the
    // seed entry does not count
    let (red_change, blue_change) = if history.len() > 1 {
        let last = history.last().map(|e| (e.red, e.blue)).unwrap_or((0, 0));
        (red as i64 - last.0 as i64, blue as i64 - last.1 as i64)
    } else {
        (0, 0)
    };

    tracing::debug!(red, blue, neutral, alienated, "population sampled");
    history.push(PopulationCounts {
        red,
        blue,
        neutral,
        alienated,
        red_change,
        blue_change,
    });
}
