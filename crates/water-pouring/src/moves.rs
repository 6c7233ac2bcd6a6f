//! Move generation and application.
//!
//! `generate_moves` and `apply` are the hot path used by the solver and
//! trust their input. `try_apply` and `replay` check every move and are
//! meant for move lists coming from outside the solver.

use serde::{Deserialize, Serialize};

use crate::error::{MoveViolation, PuzzleError};
use crate::puzzle::{Capacities, Configuration, ContainerId, Move, Problem, Volume};

/// Amount moved by `Pour { from, to }`
fn transfer_amount(
    capacities: &Capacities,
    configuration: &Configuration,
    from: ContainerId,
    to: ContainerId,
) -> Volume {
    let available = configuration.volumes()[from];
    let room = capacities.as_slice()[to] - configuration.volumes()[to];
    available.min(room)
}

/// Every legal move from `configuration`, paired with the configuration it produces.
///
/// Order is fixed: fills by increasing container, then empties by increasing
/// container, then pours by increasing `(from, to)`. The solver relies on this
/// order for reproducible tie-breaking between equally short solutions.
pub fn generate_moves(
    capacities: &Capacities,
    configuration: &Configuration,
) -> Vec<(Move, Configuration)> {
    let volumes = configuration.volumes();
    let limits = capacities.as_slice();
    let n = volumes.len();
    let mut moves = Vec::with_capacity(n * (n + 1));

    for i in 0..n {
        if volumes[i] < limits[i] {
            moves.push((Move::fill(i), configuration.with_volume(i, limits[i])));
        }
    }

    for i in 0..n {
        if volumes[i] > 0 {
            moves.push((Move::empty(i), configuration.with_volume(i, 0)));
        }
    }

    for from in 0..n {
        if volumes[from] == 0 {
            continue;
        }
        for to in 0..n {
            if from == to {
                continue;
            }
            let amount = transfer_amount(capacities, configuration, from, to);
            if amount > 0 {
                let next = configuration
                    .with_volume(from, volumes[from] - amount)
                    .with_volume(to, volumes[to] + amount);
                moves.push((Move::pour(from, to), next));
            }
        }
    }

    moves
}

/// Apply a move known to be legal for `configuration`.
///
/// # Panics
///
/// Panics if the move names a container outside the configuration.
pub fn apply(capacities: &Capacities, configuration: &Configuration, mv: Move) -> Configuration {
    match mv {
        Move::Fill { container } => {
            configuration.with_volume(container, capacities.as_slice()[container])
        }
        Move::Empty { container } => configuration.with_volume(container, 0),
        Move::Pour { from, to } => {
            let amount = transfer_amount(capacities, configuration, from, to);
            let volumes = configuration.volumes();
            configuration
                .with_volume(from, volumes[from] - amount)
                .with_volume(to, volumes[to] + amount)
        }
    }
}

/// Check that a move is legal for `configuration`
pub fn check_move(
    capacities: &Capacities,
    configuration: &Configuration,
    mv: Move,
) -> Result<(), MoveViolation> {
    let n = configuration.len().min(capacities.len());
    let known = |container: ContainerId| {
        if container < n {
            Ok(())
        } else {
            Err(MoveViolation::UnknownContainer(container))
        }
    };

    match mv {
        Move::Fill { container } => {
            known(container)?;
            if configuration.volumes()[container] == capacities.as_slice()[container] {
                return Err(MoveViolation::AlreadyFull(container));
            }
        }
        Move::Empty { container } => {
            known(container)?;
            if configuration.volumes()[container] == 0 {
                return Err(MoveViolation::AlreadyEmpty(container));
            }
        }
        Move::Pour { from, to } => {
            known(from)?;
            known(to)?;
            if from == to {
                return Err(MoveViolation::SelfPour(from));
            }
            if transfer_amount(capacities, configuration, from, to) == 0 {
                return Err(MoveViolation::NothingToPour { from, to });
            }
        }
    }

    Ok(())
}

/// Checked version of [`apply`]
pub fn try_apply(
    capacities: &Capacities,
    configuration: &Configuration,
    mv: Move,
) -> Result<Configuration, MoveViolation> {
    check_move(capacities, configuration, mv)?;
    Ok(apply(capacities, configuration, mv))
}

/// One applied move with the configurations on either side of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub before: Configuration,
    #[serde(rename = "move")]
    pub action: Move,
    pub after: Configuration,
}

/// Apply `moves` in order from `start`, recording every step.
///
/// Fails on the first illegal move, reporting its zero-based position.
pub fn replay(
    capacities: &Capacities,
    start: &Configuration,
    moves: &[Move],
) -> Result<Vec<Step>, PuzzleError> {
    start.check_fits(capacities)?;

    let mut steps = Vec::with_capacity(moves.len());
    let mut current = start.clone();

    for (step, &action) in moves.iter().enumerate() {
        let after = try_apply(capacities, &current, action).map_err(|reason| {
            PuzzleError::IllegalMove {
                step,
                attempted: action,
                reason,
            }
        })?;
        steps.push(Step {
            before: current,
            action,
            after: after.clone(),
        });
        current = after;
    }

    Ok(steps)
}

/// Simple verification: do these moves reach the problem's goal?
pub fn verify_solution(problem: &Problem, moves: &[Move]) -> bool {
    let start = problem.start_configuration();
    match replay(&problem.capacities, &start, moves) {
        Ok(steps) => {
            let end = steps.last().map_or(&start, |step| &step.after);
            problem.goal.is_satisfied(end)
        }
        Err(_) => false,
    }
}
