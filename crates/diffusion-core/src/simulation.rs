//! Simulation Driver
//!
//! One [`Simulation`] value owns one world: the graph, the agent
//! population, the turn state, and the RNG stream. There is no ambient
//! global state, so any number of simulations can run side by side.
//!
//! A turn consists of exactly `steps_per_turn` cascade steps; each
//! [`Simulation::step`] call advances one of them, introducing the acting
//! faction's pending message at the turn boundary and flipping the
//! faction after the last step of a turn. Runs are single-threaded and
//! strictly sequential: a step is one atomic unit of computation.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use diffusion_output::{GraphSnapshot, PopulationCounts, StatsSnapshot, StepReport, StepStatus};

use crate::components::agent::{Alienated, Alignment, Team};
use crate::components::message::{ActiveMessages, Message, MessageInfo, PendingMessages};
use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::output::{energy_lost, graph_snapshot, sample_population, StatsHistory};
use crate::setup::{self, AgentIndex};
use crate::systems::{local_consensus, spread_active_messages, CascadeParams};
use crate::topology::{create_topology, TopologyKind};
use crate::SimRng;

/// Why a caller should stop stepping, beyond the turn budget.
///
/// The engine only signals these; enforcing them is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Blue's energy pool is exhausted
    EnergyDepleted,
    /// Every agent is alienated
    FullyAlienated,
}

/// Resource: turn/step counters, the running flag, the Blue energy pool
/// and the most recently introduced message.
#[derive(Resource, Debug)]
pub struct SimulationState {
    pub current_team: Team,
    pub current_step: u64,
    pub turns_completed: u32,
    pub running: bool,
    pub blue_energy: f64,
    pub current_message: Option<MessageInfo>,
}

impl SimulationState {
    fn new(initial_blue_energy: f64) -> Self {
        Self {
            // Red opens the game
            current_team: Team::Red,
            current_step: 0,
            turns_completed: 0,
            running: true,
            blue_energy: initial_blue_energy,
            current_message: None,
        }
    }
}

/// An owned, self-contained simulation instance.
pub struct Simulation {
    world: World,
    schedule: Schedule,
    config: SimulationConfig,
}

impl Simulation {
    /// Builds the topology, spawns and initializes the population, and
    /// wires up the per-step schedule. Fails on invalid parameters
    /// before any state exists.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        let topology = create_topology(config.topology, config.num_nodes, config.seed)?;

        let mut world = World::new();
        world.insert_resource(SimRng(SmallRng::seed_from_u64(config.seed)));
        let index = setup::spawn_agents(&mut world, config.num_nodes);
        world.insert_resource(index);
        world.insert_resource(topology);
        world.insert_resource(CascadeParams {
            base_influence_rate: config.base_influence_rate,
        });
        world.insert_resource(ActiveMessages::default());
        world.insert_resource(PendingMessages::default());
        world.insert_resource(StatsHistory::with_initial(config.num_nodes));
        world.insert_resource(SimulationState::new(config.initial_blue_energy));
        setup::initialize_agents(&mut world, &config.initial_beliefs());

        let mut schedule = Schedule::default();
        schedule.add_systems((spread_active_messages, local_consensus, sample_population).chain());

        tracing::info!(
            nodes = config.num_nodes,
            seed = config.seed,
            turns = config.num_turns,
            "simulation created"
        );
        Ok(Self {
            world,
            schedule,
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Total step budget for the whole run.
    pub fn total_steps(&self) -> u64 {
        self.config.total_steps()
    }

    pub fn is_running(&self) -> bool {
        self.world.resource::<SimulationState>().running
    }

    pub fn current_team(&self) -> Team {
        self.world.resource::<SimulationState>().current_team
    }

    pub fn current_step(&self) -> u64 {
        self.world.resource::<SimulationState>().current_step
    }

    /// Binds a message to the faction's pending slot, replacing any
    /// previous one. The potency sentinel 0.0 (and anything outside
    /// (0,1]) is unusable and rejected here.
    pub fn set_pending_message(&mut self, team: Team, mut message: Message) -> Result<(), SimError> {
        if !(message.potency > 0.0 && message.potency <= 1.0) {
            return Err(SimError::Configuration(format!(
                "message potency {} out of range (0, 1]",
                message.potency
            )));
        }
        message.team = team;
        message.active_nodes.clear();
        message.steps_remaining = self.config.steps_per_turn;
        self.world
            .resource_mut::<PendingMessages>()
            .set(team, message);
        Ok(())
    }

    /// Starts the faction's broadcast: takes the pending message,
    /// activates a fresh source set, and adds the message to the active
    /// collection. Hard error when no message is pending, so a turn can
    /// never silently no-op.
    pub fn introduce_message(&mut self, team: Team) -> Result<Vec<u32>, SimError> {
        let Some(mut message) = self.world.resource_mut::<PendingMessages>().take(team) else {
            return Err(SimError::EmptyMessagePool(team));
        };
        message.team = team;
        let sources = self.activate_source_nodes(team);
        message.active_nodes = sources.iter().copied().collect();
        message.steps_remaining = self.config.steps_per_turn;

        tracing::info!(
            %team,
            potency = message.potency,
            sources = sources.len(),
            "message introduced"
        );
        self.world.resource_mut::<SimulationState>().current_message =
            Some(MessageInfo::from(&message));
        self.world.resource_mut::<ActiveMessages>().0.push(message);
        Ok(sources)
    }

    /// Samples source agents uniformly without replacement and forces
    /// their alignment to the acting faction.
    fn activate_source_nodes(&mut self, team: Team) -> Vec<u32> {
        let node_count = self.world.resource::<AgentIndex>().len();
        let count = ((self.config.source_activation_rate * node_count as f64).ceil() as usize)
            .min(node_count);
        let entities = self.world.resource::<AgentIndex>().entities().to_vec();

        let picked: Vec<u32> = self.world.resource_scope(|_world, mut rng: Mut<SimRng>| {
            rand::seq::index::sample(&mut rng.0, node_count, count)
                .iter()
                .map(|i| i as u32)
                .collect()
        });
        for &node in &picked {
            if let Some(mut alignment) = self.world.get_mut::<Alignment>(entities[node as usize]) {
                *alignment = team.alignment();
            }
        }
        picked
    }

    /// Advances one cascade step. Past the turn budget this is a no-op
    /// that keeps reporting `Finished`. Any error (a missing pending
    /// message) aborts before the step mutates anything, so step
    /// boundaries stay the only recovery points.
    pub fn step(&mut self) -> Result<StepReport, SimError> {
        let total = self.config.total_steps();
        let steps_per_turn = self.config.steps_per_turn as u64;

        {
            let state = self.world.resource::<SimulationState>();
            if state.current_step >= total {
                let step_index = state.current_step;
                return Ok(StepReport {
                    status: StepStatus::Finished,
                    snapshot: self.get_snapshot(),
                    step_index,
                });
            }
        }

        let (team, at_turn_start) = {
            let state = self.world.resource::<SimulationState>();
            (
                state.current_team,
                state.current_step % steps_per_turn == 0,
            )
        };
        if at_turn_start {
            self.introduce_message(team)?;
        }

        self.schedule.run(&mut self.world);

        let mut finished = false;
        let step_index = {
            let mut state = self.world.resource_mut::<SimulationState>();
            let state = &mut *state;
            state.current_step += 1;
            if state.current_step % steps_per_turn == 0 {
                // End of turn: charge Blue for its broadcast, then flip
                if state.current_team == Team::Blue {
                    let blue_potency = state
                        .current_message
                        .as_ref()
                        .filter(|info| info.team == Team::Blue)
                        .map(|info| info.potency);
                    if let Some(potency) = blue_potency {
                        let cost = energy_lost(potency);
                        state.blue_energy -= cost;
                        tracing::debug!(cost, remaining = state.blue_energy, "blue energy spent");
                    }
                }
                state.turns_completed += 1;
                state.current_team = state.current_team.opponent();
                tracing::info!(
                    turns_completed = state.turns_completed,
                    next_team = %state.current_team,
                    "turn finished"
                );
            }
            if state.current_step >= total {
                state.running = false;
                finished = true;
            }
            state.current_step
        };

        Ok(StepReport {
            status: if finished {
                StepStatus::Finished
            } else {
                StepStatus::Running
            },
            snapshot: self.get_snapshot(),
            step_index,
        })
    }

    /// Serializes the complete graph state.
    pub fn get_snapshot(&self) -> GraphSnapshot {
        graph_snapshot(&self.world)
    }

    /// Live stats view. A pure read; the Blue energy deduction happens
    /// at the end-of-turn transition, not here.
    pub fn get_stats(&self) -> StatsSnapshot {
        let index = self.world.resource::<AgentIndex>();
        let total = index.len();
        let mut red = 0usize;
        let mut blue = 0usize;
        let mut alienated = 0usize;
        for (_, entity) in index.iter() {
            match self.world.get::<Alignment>(entity) {
                Some(Alignment::Red) => red += 1,
                Some(Alignment::Blue) => blue += 1,
                _ => {}
            }
            if self
                .world
                .get::<Alienated>(entity)
                .map(|a| a.0)
                .unwrap_or(false)
            {
                alienated += 1;
            }
        }
        let neutral = total - red - blue;
        let pct = |count: usize| {
            if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            }
        };

        let state = self.world.resource::<SimulationState>();
        let (current_team, current_message_content, current_potency) = match &state.current_message
        {
            Some(info) => (
                Some(info.team.to_string()),
                Some(info.content.clone()),
                Some(info.potency),
            ),
            None => (None, None, None),
        };

        StatsSnapshot {
            current_team,
            current_message_content,
            current_potency,
            red_count: red,
            red_pct: pct(red),
            blue_count: blue,
            blue_pct: pct(blue),
            neutral_count: neutral,
            neutral_pct: pct(neutral),
            alienated_count: alienated,
            alienated_pct: pct(alienated),
            blue_energy: state.blue_energy,
        }
    }

    /// Ordered per-step population history, starting with the baseline
    /// entry.
    pub fn history(&self) -> &[PopulationCounts] {
        self.world.resource::<StatsHistory>().entries()
    }

    /// Signals run termination conditions for the caller to act on.
    pub fn termination(&self) -> Option<TerminationReason> {
        let state = self.world.resource::<SimulationState>();
        if state.blue_energy <= 0.0 {
            return Some(TerminationReason::EnergyDepleted);
        }
        let index = self.world.resource::<AgentIndex>();
        let all_alienated = !index.is_empty()
            && index.iter().all(|(_, entity)| {
                self.world
                    .get::<Alienated>(entity)
                    .map(|a| a.0)
                    .unwrap_or(false)
            });
        if all_alienated {
            return Some(TerminationReason::FullyAlienated);
        }
        None
    }

    /// Resets agent state, turn counters, messages, history and the RNG
    /// stream while keeping the existing graph. A restarted simulation
    /// behaves exactly like a fresh instance built with the same seed
    /// and topology.
    pub fn restart(&mut self) {
        let node_count = self.world.resource::<AgentIndex>().len();
        self.world
            .insert_resource(SimRng(SmallRng::seed_from_u64(self.config.seed)));
        self.world.resource_mut::<ActiveMessages>().clear();
        self.world.resource_mut::<PendingMessages>().clear();
        self.world.resource_mut::<StatsHistory>().reset(node_count);
        *self.world.resource_mut::<SimulationState>() =
            SimulationState::new(self.config.initial_blue_energy);
        setup::initialize_agents(&mut self.world, &self.config.initial_beliefs());
        tracing::info!("simulation restarted");
    }

    /// Replaces the graph with a freshly generated one and restarts on
    /// it, re-initializing Neutral agents at the given uncertainty.
    pub fn rebuild_topology(
        &mut self,
        kind: TopologyKind,
        node_count: usize,
        initial_uncertainty: f64,
    ) -> Result<(), SimError> {
        let topology = create_topology(kind, node_count, self.config.seed)?;

        if let Some(old_index) = self.world.remove_resource::<AgentIndex>() {
            setup::despawn_agents(&mut self.world, &old_index);
        }
        let index = setup::spawn_agents(&mut self.world, node_count);
        self.world.insert_resource(index);
        self.world.insert_resource(topology);

        self.config.num_nodes = node_count;
        self.config.topology = kind;
        self.config.initial_uncertainty = initial_uncertainty;
        self.restart();
        Ok(())
    }
}
