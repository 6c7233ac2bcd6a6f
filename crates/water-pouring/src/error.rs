//! Error types for puzzle construction, move replay and solving.

use thiserror::Error;

use crate::puzzle::{ContainerId, Move};

/// Why a move cannot be applied to a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveViolation {
    #[error("container {0} does not exist")]
    UnknownContainer(ContainerId),

    #[error("cannot pour container {0} into itself")]
    SelfPour(ContainerId),

    #[error("container {0} is already full")]
    AlreadyFull(ContainerId),

    #[error("container {0} is already empty")]
    AlreadyEmpty(ContainerId),

    #[error("nothing can be poured from container {from} into container {to}")]
    NothingToPour { from: ContainerId, to: ContainerId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("Invalid capacities: {0}")]
    InvalidCapacities(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Illegal move {attempted} at step {step}: {reason}")]
    IllegalMove {
        step: usize,
        attempted: Move,
        #[source]
        reason: MoveViolation,
    },

    #[error("Failed to parse '{input}': {reason}")]
    Parse { input: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error(transparent)]
    Invalid(#[from] PuzzleError),

    #[error("Search space of {size} configurations exceeds the limit of {limit}")]
    SearchSpaceTooLarge { size: u64, limit: u64 },
}
