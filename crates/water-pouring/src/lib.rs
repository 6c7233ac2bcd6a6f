//! Shortest-path solver for the generalized water pouring puzzle.
//!
//! Given containers of fixed capacities and a goal (a target volume in any
//! container, or an exact configuration), the solver finds a minimum-length
//! sequence of fill, empty and pour moves, or reports that none exists.

pub mod error;
pub mod limits;
pub mod moves;
pub mod puzzle;
pub mod solver;

// Re-export main types
pub use error::{MoveViolation, PuzzleError, SolveError};
pub use limits::{check_state_space, state_space_size, DEFAULT_MAX_STATE_SPACE};
pub use moves::{apply, generate_moves, replay, try_apply, verify_solution, Step};
pub use puzzle::{
    parse_glasses, parse_target, Capacities, Configuration, ContainerId, Goal, Move, Problem,
    Volume,
};
pub use solver::{solve, solve_problem, Outcome, SearchStats, SolveReport, SolverConfig};
