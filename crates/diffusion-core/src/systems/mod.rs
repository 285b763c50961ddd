//! ECS Systems
//!
//! The three passes that make up one cascade step: message spreading,
//! local consensus, and population sampling (the latter lives in
//! `output::stats`).

pub mod cascade;
pub mod consensus;
pub mod opinion;

pub use cascade::{spread_active_messages, CascadeParams};
pub use consensus::local_consensus;
pub use opinion::{expose, Exposure};
