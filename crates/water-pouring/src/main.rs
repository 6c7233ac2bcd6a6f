//! CLI entry point for the water pouring solver.
//!
//! Usage:
//!   water-pouring solve --capacities "3,5" --target 4
//!   water-pouring solve --from "12/12, 0/8, 0/5" --to "6/12, 6/8, 0/5"
//!   water-pouring solve <problem.json>
//!   water-pouring solve --stdin
//!
//! Options:
//!   --max-state-space <n>   Refuse problems with more configurations (default: 10000000)
//!   -v, -vv, -vvv           Log INFO, DEBUG or TRACE to stderr
//!   -q, --quiet             Only log errors
//!
//! Exit codes: 0 solved, 1 unreachable, 2 invalid input.

mod logging;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use water_pouring::{
    parse_target, replay, solve_problem, Capacities, Move, Problem, PuzzleError, SolveError,
    SolveReport, SolverConfig, Step, DEFAULT_MAX_STATE_SPACE,
};

#[derive(Parser)]
#[command(name = "water-pouring")]
#[command(about = "Shortest-path solver for the water pouring puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a shortest sequence of moves reaching the goal
    Solve(SolveArgs),
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Path to a problem JSON file
    #[arg(value_name = "FILE", conflicts_with_all = ["stdin", "capacities", "from"])]
    file: Option<PathBuf>,

    /// Read the problem JSON from stdin
    #[arg(long, conflicts_with_all = ["capacities", "from"])]
    stdin: bool,

    /// Comma-separated capacities, e.g. "3,5"
    #[arg(long, value_name = "LIST", allow_hyphen_values = true, requires = "target")]
    capacities: Option<String>,

    /// Volume that some container must hold
    #[arg(long, value_name = "VOLUME", allow_hyphen_values = true, requires = "capacities")]
    target: Option<String>,

    /// Start glasses, e.g. "12/12, 0/8, 0/5"
    #[arg(long, value_name = "GLASSES", conflicts_with = "capacities", requires = "to")]
    from: Option<String>,

    /// Goal glasses, e.g. "6/12, 6/8, 0/5"
    #[arg(long, value_name = "GLASSES", requires = "from")]
    to: Option<String>,

    /// Maximum number of configurations the search may have to consider
    #[arg(long, default_value_t = DEFAULT_MAX_STATE_SPACE)]
    max_state_space: u64,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid problem JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Output format for a solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    moves: Vec<Move>,
    steps: Vec<Step>,
    states_explored: usize,
    states_discovered: usize,
    max_depth: usize,
    time_elapsed_ms: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the problem was solved
fn run(cli: Cli) -> Result<bool, CliError> {
    logging::setup_logging(cli.verbose, cli.quiet).map_err(CliError::Logging)?;

    match cli.command {
        Commands::Solve(args) => {
            let problem = load_problem(&args)?;
            info!(%problem, "solving");

            let config = SolverConfig {
                max_state_space: args.max_state_space,
            };
            let report = solve_problem(&problem, &config)?;
            debug!(stats = ?report.stats, "search finished");

            let output = format_result(&problem, &report)?;
            println!("{}", serde_json::to_string_pretty(&output)?);

            Ok(output.solved)
        }
    }
}

fn load_problem(args: &SolveArgs) -> Result<Problem, CliError> {
    if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(serde_json::from_str(&buffer)?);
    }

    if let Some(path) = &args.file {
        let content = fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&content)?);
    }

    if let (Some(capacities), Some(target)) = (&args.capacities, &args.target) {
        let capacities: Capacities = capacities.parse()?;
        let target = parse_target(target)?;
        return Ok(Problem::with_target(capacities, target));
    }

    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        return Ok(Problem::from_glasses(from, to)?);
    }

    Err(CliError::Argument(
        "provide a problem file, --stdin, --capacities with --target, or --from with --to"
            .to_string(),
    ))
}

fn format_result(problem: &Problem, report: &SolveReport) -> Result<SolveOutput, CliError> {
    let (solved, reason, moves, steps) = match report.outcome.moves() {
        Some(moves) => {
            let steps = replay(&problem.capacities, &problem.start_configuration(), moves)?;
            (true, None, moves.to_vec(), steps)
        }
        None => (
            false,
            Some("no_solution".to_string()),
            Vec::new(),
            Vec::new(),
        ),
    };

    Ok(SolveOutput {
        solved,
        reason,
        moves,
        steps,
        states_explored: report.stats.states_explored,
        states_discovered: report.stats.states_discovered,
        max_depth: report.stats.max_depth,
        time_elapsed_ms: report.stats.time_elapsed_ms,
    })
}
