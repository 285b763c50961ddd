//! Population Setup
//!
//! Agent spawning and belief-state initialization.

pub mod agents;

pub use agents::*;
