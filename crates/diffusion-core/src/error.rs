//! Simulation error taxonomy.
//!
//! Every fallible operation in the engine returns one of these. All other
//! computation (probability draws, belief arithmetic) is total over its
//! input domain and cannot fail.

use thiserror::Error;

use crate::components::agent::Team;

/// Errors raised by the diffusion engine.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid topology or simulation parameters, rejected before any
    /// state is constructed or mutated.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A team identifier other than Red/Blue was supplied at an I/O
    /// boundary (config file, CLI, external caller).
    #[error("invalid team '{0}': must be 'Red' or 'Blue'")]
    InvalidTeam(String),

    /// A turn was started with no pending message bound for the acting
    /// faction. Starting a turn without a message would silently no-op,
    /// so this is a hard error.
    #[error("no pending message for the {0} faction")]
    EmptyMessagePool(Team),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::Configuration("node count must be positive".to_string());
        assert!(err.to_string().contains("invalid configuration"));

        let err = SimError::InvalidTeam("Green".to_string());
        assert!(err.to_string().contains("Green"));

        let err = SimError::EmptyMessagePool(Team::Blue);
        assert!(err.to_string().contains("Blue"));
    }
}
