//! Breadth-first solver for shortest pouring sequences.
//!
//! Every move costs one step, so the first goal configuration dequeued
//! from the FIFO frontier is reached by a minimum number of moves.
//! Configurations are marked visited when enqueued, so each one is
//! expanded at most once even though pouring creates cycles.
//!
//! When several shortest solutions exist, the one returned follows from
//! the move generation order in [`generate_moves`] and from the first
//! path to discover a configuration keeping it.

use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::SolveError;
use crate::limits::{check_state_space, DEFAULT_MAX_STATE_SPACE};
use crate::moves::generate_moves;
use crate::puzzle::{Capacities, Configuration, Move, Problem, Volume};

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum product of `capacity + 1` over all containers
    pub max_state_space: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_state_space: DEFAULT_MAX_STATE_SPACE,
        }
    }
}

/// Whether the goal can be reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// A shortest sequence of moves reaching the goal
    Solved { moves: Vec<Move> },
    /// The search exhausted every reachable configuration
    Unreachable,
}

impl Outcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved { .. })
    }

    pub fn moves(&self) -> Option<&[Move]> {
        match self {
            Outcome::Solved { moves } => Some(moves),
            Outcome::Unreachable => None,
        }
    }
}

/// Counters collected during one search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Configurations taken off the frontier
    pub states_explored: usize,
    /// Configurations ever enqueued, the start included
    pub states_discovered: usize,
    /// Deepest level dequeued
    pub max_depth: usize,
    pub time_elapsed_ms: u64,
}

/// Outcome plus search statistics
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub outcome: Outcome,
    pub stats: SearchStats,
}

/// A configuration reached during the search
#[derive(Debug)]
struct SearchNode {
    configuration: Configuration,
    /// Index of the predecessor node and the move that led here
    parent: Option<(usize, Move)>,
    depth: usize,
}

/// Find a shortest sequence of moves that leaves some container holding `target`,
/// starting from all containers empty.
pub fn solve(capacities: &[Volume], target: Volume) -> Result<Outcome, SolveError> {
    let capacities = Capacities::new(capacities.iter().copied())?;
    let problem = Problem::with_target(capacities, target);
    solve_problem(&problem, &SolverConfig::default()).map(|report| report.outcome)
}

/// Solve an arbitrary problem: custom start and either goal kind.
#[instrument(skip_all, fields(problem = %problem))]
pub fn solve_problem(problem: &Problem, config: &SolverConfig) -> Result<SolveReport, SolveError> {
    let start_time = Instant::now();
    problem.validate()?;

    let start = problem.start_configuration();
    let mut stats = SearchStats::default();

    if problem.goal.is_satisfied(&start) {
        debug!("start configuration already satisfies the goal");
        stats.states_explored = 1;
        stats.states_discovered = 1;
        stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
        return Ok(SolveReport {
            outcome: Outcome::Solved { moves: Vec::new() },
            stats,
        });
    }

    let size = check_state_space(&problem.capacities, config.max_state_space)?;
    debug!(state_space = size, "starting breadth-first search");

    let mut nodes: Vec<SearchNode> = vec![SearchNode {
        configuration: start.clone(),
        parent: None,
        depth: 0,
    }];
    let mut visited: HashSet<Configuration> = HashSet::new();
    visited.insert(start);
    let mut frontier: VecDeque<usize> = VecDeque::new();
    frontier.push_back(0);

    while let Some(index) = frontier.pop_front() {
        stats.states_explored += 1;

        let depth = nodes[index].depth;
        if depth > stats.max_depth {
            trace!(depth, frontier = frontier.len(), "expanding next depth");
            stats.max_depth = depth;
        }

        if problem.goal.is_satisfied(&nodes[index].configuration) {
            let moves = reconstruct_path(&nodes, index);
            stats.states_discovered = visited.len();
            stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
            debug!(
                moves = moves.len(),
                explored = stats.states_explored,
                "goal reached"
            );
            return Ok(SolveReport {
                outcome: Outcome::Solved { moves },
                stats,
            });
        }

        for (mv, next) in generate_moves(&problem.capacities, &nodes[index].configuration) {
            if visited.contains(&next) {
                continue;
            }
            visited.insert(next.clone());
            nodes.push(SearchNode {
                configuration: next,
                parent: Some((index, mv)),
                depth: depth + 1,
            });
            frontier.push_back(nodes.len() - 1);
        }
    }

    stats.states_discovered = visited.len();
    stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
    debug!(explored = stats.states_explored, "search exhausted without reaching the goal");

    Ok(SolveReport {
        outcome: Outcome::Unreachable,
        stats,
    })
}

/// Walk predecessor links back from `goal` and return the moves in forward order
fn reconstruct_path(nodes: &[SearchNode], goal: usize) -> Vec<Move> {
    let mut moves = Vec::with_capacity(nodes[goal].depth);
    let mut current = goal;
    while let Some((parent, mv)) = nodes[current].parent {
        moves.push(mv);
        current = parent;
    }
    moves.reverse();
    moves
}
