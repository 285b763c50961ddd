//! Message State
//!
//! Faction broadcasts and the resources tracking which of them are
//! pending or actively cascading.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::components::agent::Team;

/// A faction broadcast cascading through the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub team: Team,
    /// Strength coefficient in (0,1]; scales both the influence
    /// probability and the belief-update magnitude.
    pub potency: f64,
    pub content: String,
    /// Current wavefront. Ordered so iteration is reproducible; rebuilt
    /// into a fresh set every step, never mutated while traversed.
    pub active_nodes: BTreeSet<u32>,
    /// Propagation steps left; the message leaves the active set when
    /// this reaches zero.
    pub steps_remaining: u32,
}

impl Message {
    pub fn new(team: Team, content: impl Into<String>, potency: f64) -> Self {
        Self {
            team,
            potency,
            content: content.into(),
            active_nodes: BTreeSet::new(),
            steps_remaining: 0,
        }
    }
}

/// Summary of the most recently introduced message, kept for stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageInfo {
    pub team: Team,
    pub content: String,
    pub potency: f64,
}

impl From<&Message> for MessageInfo {
    fn from(message: &Message) -> Self {
        Self {
            team: message.team,
            content: message.content.clone(),
            potency: message.potency,
        }
    }
}

/// Resource: one pending message slot per faction, filled by the caller
/// before that faction's turn starts.
#[derive(Resource, Debug, Default)]
pub struct PendingMessages {
    red: Option<Message>,
    blue: Option<Message>,
}

impl PendingMessages {
    fn slot(&mut self, team: Team) -> &mut Option<Message> {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        }
    }

    pub fn set(&mut self, team: Team, message: Message) {
        *self.slot(team) = Some(message);
    }

    pub fn take(&mut self, team: Team) -> Option<Message> {
        self.slot(team).take()
    }

    pub fn get(&self, team: Team) -> Option<&Message> {
        match team {
            Team::Red => self.red.as_ref(),
            Team::Blue => self.blue.as_ref(),
        }
    }

    pub fn clear(&mut self) {
        self.red = None;
        self.blue = None;
    }
}

/// Resource: messages currently cascading through the graph.
#[derive(Resource, Debug, Default)]
pub struct ActiveMessages(pub Vec<Message>);

impl ActiveMessages {
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
