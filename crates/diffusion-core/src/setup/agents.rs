//! Agent Spawning and Initialization
//!
//! One entity per topology node, each carrying the five-attribute belief
//! record. Initialization is re-invocable: a restart overwrites every
//! attribute in place so no state leaks across runs.

use bevy_ecs::prelude::*;
use rand::Rng;

use crate::components::agent::{Alienated, Alignment, NodeId, Susceptibility, Uncertainty};
use crate::SimRng;

/// Resource: maps stable node ids to their entities.
///
/// All per-node iteration goes through this index in ascending id order,
/// which keeps the cascade and consensus passes reproducible.
#[derive(Resource, Debug, Default)]
pub struct AgentIndex {
    entities: Vec<Entity>,
}

impl AgentIndex {
    pub fn entity(&self, node: u32) -> Entity {
        self.entities[node as usize]
    }

    pub fn get(&self, node: u32) -> Option<Entity> {
        self.entities.get(node as usize).copied()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Ascending (node id, entity) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Entity)> + '_ {
        self.entities
            .iter()
            .enumerate()
            .map(|(id, &entity)| (id as u32, entity))
    }
}

/// Initial belief-state distribution parameters.
#[derive(Debug, Clone, Copy)]
pub struct InitialBeliefs {
    /// When set, agents start on a uniformly-random faction instead of
    /// Neutral.
    pub randomized_start: bool,
    /// Neutral starting uncertainty (the "very unsure" sentinel).
    pub initial_uncertainty: f64,
    /// Half-width of the symmetric uncertainty range used with
    /// `randomized_start`.
    pub uncertainty_range: f64,
}

/// Spawns one agent entity per node and returns the id index.
///
/// Attributes are placeholders until [`initialize_agents`] runs.
pub fn spawn_agents(world: &mut World, node_count: usize) -> AgentIndex {
    let mut entities = Vec::with_capacity(node_count);
    for id in 0..node_count as u32 {
        let entity = world
            .spawn((
                NodeId(id),
                Alignment::Neutral,
                Susceptibility(0.0),
                Uncertainty(0.0),
                Alienated(false),
            ))
            .id();
        entities.push(entity);
    }
    AgentIndex { entities }
}

/// Despawns every agent entity tracked by the index.
pub fn despawn_agents(world: &mut World, index: &AgentIndex) {
    for &entity in index.entities() {
        world.despawn(entity);
    }
}

/// Draws every agent's attributes from the simulation RNG, fully
/// overwriting whatever was there before.
///
/// Draw order per node is fixed (susceptibility, then the alignment
/// branch) so identical seeds give identical populations.
pub fn initialize_agents(world: &mut World, beliefs: &InitialBeliefs) {
    let entities: Vec<Entity> = world.resource::<AgentIndex>().entities().to_vec();
    world.resource_scope(|world, mut rng: Mut<SimRng>| {
        for entity in entities {
            let susceptibility = rng.0.gen::<f64>();
            let (alignment, uncertainty) = if beliefs.randomized_start {
                let faction = if rng.0.gen_range(0..2) == 0 {
                    Alignment::Red
                } else {
                    Alignment::Blue
                };
                let range = beliefs.uncertainty_range;
                (faction, rng.0.gen_range(-range..=range))
            } else {
                (Alignment::Neutral, beliefs.initial_uncertainty)
            };

            let mut agent = world.entity_mut(entity);
            if let Some(mut value) = agent.get_mut::<Susceptibility>() {
                value.0 = susceptibility;
            }
            if let Some(mut value) = agent.get_mut::<Alignment>() {
                *value = alignment;
            }
            if let Some(mut value) = agent.get_mut::<Uncertainty>() {
                value.0 = uncertainty;
            }
            if let Some(mut value) = agent.get_mut::<Alienated>() {
                value.0 = false;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn world_with_agents(n: usize, seed: u64) -> World {
        let mut world = World::new();
        world.insert_resource(SimRng(SmallRng::seed_from_u64(seed)));
        let index = spawn_agents(&mut world, n);
        world.insert_resource(index);
        world
    }

    #[test]
    fn test_spawn_assigns_sequential_ids() {
        let world = world_with_agents(5, 42);
        let index = world.resource::<AgentIndex>();
        assert_eq!(index.len(), 5);
        for (id, entity) in index.iter() {
            assert_eq!(world.get::<NodeId>(entity).unwrap().0, id);
        }
    }

    #[test]
    fn test_neutral_start() {
        let mut world = world_with_agents(10, 42);
        let beliefs = InitialBeliefs {
            randomized_start: false,
            initial_uncertainty: 2.0,
            uncertainty_range: 2.0,
        };
        initialize_agents(&mut world, &beliefs);

        let entities = world.resource::<AgentIndex>().entities().to_vec();
        for entity in entities {
            assert_eq!(*world.get::<Alignment>(entity).unwrap(), Alignment::Neutral);
            assert_eq!(world.get::<Uncertainty>(entity).unwrap().0, 2.0);
            let susceptibility = world.get::<Susceptibility>(entity).unwrap().0;
            assert!((0.0..=1.0).contains(&susceptibility));
            assert!(!world.get::<Alienated>(entity).unwrap().0);
        }
    }

    #[test]
    fn test_randomized_start() {
        let mut world = world_with_agents(50, 42);
        let beliefs = InitialBeliefs {
            randomized_start: true,
            initial_uncertainty: 2.0,
            uncertainty_range: 1.5,
        };
        initialize_agents(&mut world, &beliefs);

        let entities = world.resource::<AgentIndex>().entities().to_vec();
        let mut saw_red = false;
        let mut saw_blue = false;
        for entity in entities {
            match *world.get::<Alignment>(entity).unwrap() {
                Alignment::Red => saw_red = true,
                Alignment::Blue => saw_blue = true,
                Alignment::Neutral => panic!("randomized start should never leave Neutral"),
            }
            let uncertainty = world.get::<Uncertainty>(entity).unwrap().0;
            assert!((-1.5..=1.5).contains(&uncertainty));
        }
        assert!(saw_red && saw_blue, "50 draws should hit both factions");
    }

    #[test]
    fn test_reinitialization_clears_residual_state() {
        let mut world = world_with_agents(4, 42);
        let beliefs = InitialBeliefs {
            randomized_start: false,
            initial_uncertainty: 2.0,
            uncertainty_range: 2.0,
        };
        initialize_agents(&mut world, &beliefs);

        // Dirty every attribute, including the one-way flag
        let entities = world.resource::<AgentIndex>().entities().to_vec();
        for entity in &entities {
            *world.get_mut::<Alignment>(*entity).unwrap() = Alignment::Red;
            world.get_mut::<Uncertainty>(*entity).unwrap().0 = -0.9;
            world.get_mut::<Alienated>(*entity).unwrap().0 = true;
        }

        initialize_agents(&mut world, &beliefs);
        for entity in entities {
            assert_eq!(*world.get::<Alignment>(entity).unwrap(), Alignment::Neutral);
            assert_eq!(world.get::<Uncertainty>(entity).unwrap().0, 2.0);
            assert!(!world.get::<Alienated>(entity).unwrap().0);
        }
    }

    #[test]
    fn test_initialization_determinism() {
        let beliefs = InitialBeliefs {
            randomized_start: true,
            initial_uncertainty: 2.0,
            uncertainty_range: 2.0,
        };

        let draws = |seed: u64| -> Vec<(f64, Alignment, f64)> {
            let mut world = world_with_agents(20, seed);
            initialize_agents(&mut world, &beliefs);
            let entities = world.resource::<AgentIndex>().entities().to_vec();
            entities
                .into_iter()
                .map(|e| {
                    (
                        world.get::<Susceptibility>(e).unwrap().0,
                        *world.get::<Alignment>(e).unwrap(),
                        world.get::<Uncertainty>(e).unwrap().0,
                    )
                })
                .collect()
        };

        assert_eq!(draws(7), draws(7));
        assert_ne!(draws(7), draws(8));
    }
}
