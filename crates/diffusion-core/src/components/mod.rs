//! ECS Components
//!
//! Agent belief attributes and message state.

pub mod agent;
pub mod message;

pub use agent::*;
pub use message::*;
