//! Headless Diffusion Runner
//!
//! Drives a full turn-by-turn run of the diffusion engine from the
//! command line, feeding both factions fixed-potency placeholder
//! messages each turn, and writes periodic graph snapshots plus the
//! population history as JSON.

use clap::{Parser, ValueEnum};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use diffusion_core::components::agent::Team;
use diffusion_core::components::message::Message;
use diffusion_core::{Simulation, SimulationConfig, TopologyKind};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "diffusion_sim")]
#[command(about = "A competitive opinion diffusion engine")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of agents in the graph
    #[arg(long, default_value_t = 50)]
    nodes: usize,

    /// Topology family
    #[arg(long, value_enum, default_value = "small-world")]
    topology: TopologyFamily,

    /// Edge probability (uniform-random family)
    #[arg(long, default_value_t = 0.05)]
    edge_probability: f64,

    /// Neighbour links per node (small-world family)
    #[arg(long, default_value_t = 4)]
    neighbours: u32,

    /// Rewire probability (small-world family)
    #[arg(long, default_value_t = 0.1)]
    rewire_probability: f64,

    /// Attachment degree (preferential-attachment family)
    #[arg(long, default_value_t = 2)]
    attachment: u32,

    /// Number of turns to play
    #[arg(long, default_value_t = 40)]
    turns: u32,

    /// Cascade steps per turn
    #[arg(long, default_value_t = 2)]
    steps_per_turn: u32,

    /// Potency of every Red broadcast
    #[arg(long, default_value_t = 0.6)]
    red_potency: f64,

    /// Potency of every Blue broadcast
    #[arg(long, default_value_t = 0.5)]
    blue_potency: f64,

    /// Start agents on random factions instead of Neutral
    #[arg(long)]
    randomized_start: bool,

    /// Interval between written snapshots (in steps)
    #[arg(long, default_value_t = 10)]
    snapshot_interval: u64,

    /// Output directory for snapshots and history
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Optional TOML config file; CLI flags override its core fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-step cascade detail in the log output
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TopologyFamily {
    UniformRandom,
    SmallWorld,
    PreferentialAttachment,
}

impl Args {
    fn topology_kind(&self) -> TopologyKind {
        match self.topology {
            TopologyFamily::UniformRandom => TopologyKind::UniformRandom {
                edge_probability: self.edge_probability,
            },
            TopologyFamily::SmallWorld => TopologyKind::SmallWorld {
                neighbours: self.neighbours,
                rewire_probability: self.rewire_probability,
            },
            TopologyFamily::PreferentialAttachment => TopologyKind::PreferentialAttachment {
                attachment: self.attachment,
            },
        }
    }

    fn build_config(&self) -> Result<SimulationConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)?,
            None => SimulationConfig::default(),
        };
        config.seed = self.seed;
        config.num_nodes = self.nodes;
        config.topology = self.topology_kind();
        config.num_turns = self.turns;
        config.steps_per_turn = self.steps_per_turn;
        config.randomized_start = self.randomized_start;
        Ok(config)
    }
}

fn potency_for(args: &Args, team: Team) -> f64 {
    match team {
        Team::Red => args.red_potency,
        Team::Blue => args.blue_potency,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.build_config()?;
    let steps_per_turn = config.steps_per_turn as u64;

    fs::create_dir_all(args.output_dir.join("snapshots"))?;

    let mut sim = Simulation::new(config)?;
    tracing::info!(
        seed = args.seed,
        nodes = args.nodes,
        turns = args.turns,
        "starting run"
    );

    let mut turn = 0u32;
    loop {
        if sim.current_step() % steps_per_turn == 0 {
            turn += 1;
            let team = sim.current_team();
            let content = format!("{team} broadcast #{turn}");
            sim.set_pending_message(team, Message::new(team, content, potency_for(&args, team)))?;
        }

        let report = sim.step()?;

        if report.step_index % args.snapshot_interval == 0 || report.is_finished() {
            let path = args
                .output_dir
                .join("snapshots")
                .join(format!("snapshot_{:05}.json", report.step_index));
            fs::write(&path, report.snapshot.to_json()?)?;
        }

        if let Some(reason) = sim.termination() {
            tracing::info!(?reason, step = report.step_index, "run terminated early");
            break;
        }
        if report.is_finished() {
            tracing::info!(step = report.step_index, "turn budget exhausted");
            break;
        }
    }

    let stats = sim.get_stats();
    tracing::info!(
        red = stats.red_count,
        blue = stats.blue_count,
        neutral = stats.neutral_count,
        alienated = stats.alienated_count,
        blue_energy = stats.blue_energy,
        "final population"
    );

    let history_json = serde_json::to_string_pretty(sim.history())?;
    fs::write(args.output_dir.join("stats_history.json"), history_json)?;
    fs::write(
        args.output_dir.join("final_stats.json"),
        serde_json::to_string_pretty(&stats)?,
    )?;

    Ok(())
}
