//! # satplan
//!
//! `satplan` is a command-line planner for classical STRIPS problems that
//! works by reduction to propositional satisfiability. The grounded problem
//! is compiled into a CNF formula over a bounded number of action steps; if
//! the formula is unsatisfiable the bound is raised by one and the encoding
//! is extended in place, until a model is found or a configured ceiling is
//! exhausted. A satisfying model decodes directly into a plan.
//!
//! ## Features
//!
//! -   **Grounded problem files**: a small line-oriented text format listing
//!     fluents, the initial state, goal literals, and ground actions.
//! -   **Iterative deepening**: starts at a delete-relaxation lower bound
//!     and grows the horizon one step at a time.
//! -   **Built-in DPLL engine**: deterministic, so re-solving a problem
//!     reproduces the same plan.
//! -   **Plan validation**: found plans are re-simulated against the problem
//!     before being reported.
//! -   **DIMACS export**: the final CNF encoding can be written to a file
//!     for inspection with off-the-shelf SAT tooling.
//! -   **Statistics**: encode/solve time split, horizons tried, clause and
//!     variable counts, and memory usage via `tikv-jemallocator`.
//!
//! ## Usage
//!
//! ```sh
//! satplan <path_to_problem_file> [OPTIONS]
//! ```
//!
//! ### Options
//!
//! -   `--step-ceiling <N>`: give up past this horizon (default: `50`).
//! -   `--timeout <SECS>`: wall-clock budget per SAT call (default: `3600`).
//! -   `--export-dimacs`: write the final encoding next to the problem file.
//! -   `--validate`: re-simulate the plan before reporting it (default: `true`).
//! -   `--print-plan`: print the plan's action sequence (default: `true`).
//! -   `--stats`: print the statistics table (default: `true`).
//!
//! ## Example Invocations
//!
//! ```sh
//! # Solve a problem with the defaults
//! satplan problems/logistics.plan
//!
//! # Tight budget, keep the CNF around
//! satplan problems/logistics.plan --step-ceiling 20 --export-dimacs
//! ```

use clap::Parser;
use satplan::planning::{
    Encoding, Plan, PlanningError, Problem, RelaxedReachability, Search, SearchConfig, SearchStats,
    parse_problem_file,
};
use satplan::sat::{Dpll, dimacs};
use std::time::Duration;
use tikv_jemalloc_ctl::{epoch, stats};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command-line interface of the planner.
#[derive(Parser, Debug)]
#[command(name = "satplan", version, about = "A SAT-based STRIPS planner")]
struct Cli {
    /// Path to the grounded problem file.
    path: String,

    /// Horizon ceiling: the search gives up past this many action steps.
    #[arg(long, default_value_t = 50)]
    step_ceiling: usize,

    /// Wall-clock budget per SAT call, in seconds.
    #[arg(long, default_value_t = 3600)]
    timeout: u64,

    /// Write the final CNF encoding to `<path>.cnf` in DIMACS format.
    #[arg(long, default_value_t = false)]
    export_dimacs: bool,

    /// Re-simulate the plan against the problem before reporting it.
    #[arg(long, default_value_t = true)]
    validate: bool,

    /// Print the plan's action sequence.
    #[arg(long, default_value_t = true)]
    print_plan: bool,

    /// Print the statistics table after the search.
    #[arg(long, default_value_t = true)]
    stats: bool,
}

fn main() {
    let cli = Cli::parse();

    let time = std::time::Instant::now();
    let problem = match parse_problem_file(&cli.path) {
        Ok(problem) => problem,
        Err(e) => {
            eprintln!("Error parsing problem file {}: {}", cli.path, e);
            std::process::exit(1);
        }
    };
    let parse_time = time.elapsed();

    println!("Solving: {:?}", cli.path);

    let config = SearchConfig {
        step_ceiling: cli.step_ceiling,
        solver_timeout: Duration::from_secs(cli.timeout),
        ..SearchConfig::default()
    };

    epoch::advance().unwrap();

    let mut engine = Dpll::new();
    let mut search = Search::new(&problem, &mut engine, config);
    let outcome = search.run(&RelaxedReachability);
    let run_stats = search.stats().clone();

    epoch::advance().unwrap();
    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();
    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    if cli.stats {
        print_stats(parse_time, &problem, &run_stats, allocated_mib, resident_mib);
    }

    match outcome {
        Ok(plan) => {
            if cli.validate && !plan.validate(&problem) {
                eprintln!("Plan failed validation!");
                std::process::exit(1);
            }
            if cli.export_dimacs {
                export_encoding(&cli.path, &problem, &run_stats);
            }
            if cli.print_plan {
                report_plan(&plan, &problem);
            }
        }
        Err(PlanningError::InfeasibleWithinBudget {
            ceiling,
            lower_bound,
        }) => {
            println!(
                "No plan within {} steps (lower bound {})",
                ceiling, lower_bound
            );
        }
        Err(e) => {
            eprintln!("Planning failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Prints the plan, or announces that the goal already holds.
fn report_plan(plan: &Plan, problem: &Problem) {
    if plan.is_empty() {
        println!("Goal already satisfied; empty plan.");
    } else {
        println!("Plan ({} steps):", plan.len());
        print!("{}", plan.render(problem));
    }
}

/// Rebuilds the encoding at the final horizon and writes it out in DIMACS
/// format. Extension is additive, so a direct build at that horizon
/// produces exactly the formula the last SAT call saw.
fn export_encoding(path: &str, problem: &Problem, run_stats: &SearchStats) {
    let encoding = match Encoding::new(problem, run_stats.final_horizon, run_stats.final_horizon) {
        Ok(encoding) => encoding,
        Err(e) => {
            eprintln!("Unable to rebuild encoding for export: {}", e);
            return;
        }
    };
    let dimacs_path = format!("{path}.cnf");
    match dimacs::write_file(&dimacs_path, encoding.clauses(), encoding.max_var()) {
        Ok(()) => println!("DIMACS written to: {dimacs_path}"),
        Err(e) => eprintln!("Unable to write file {}: {}", dimacs_path, e),
    }
}

/// Helper to print one statistic line as a formatted table row.
fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {:<28} {:>18}  |", label, value);
}

/// Prints a summary of the problem and the search.
fn print_stats(
    parse_time: Duration,
    problem: &Problem,
    s: &SearchStats,
    allocated: f64,
    resident: f64,
) {
    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Fluents", problem.num_fluents());
    stat_line("Ground actions", problem.num_actions());

    println!("========================[ Search Statistics ]========================");
    stat_line("Horizons tried", s.horizons_tried);
    stat_line("Final horizon", s.final_horizon);
    stat_line("Clauses (final)", s.clauses);
    stat_line("Variables (final)", s.max_var);
    stat_line("Encode time (s)", format!("{:.3}", s.encode_time.as_secs_f64()));
    stat_line("Solve time (s)", format!("{:.3}", s.solve_time.as_secs_f64()));
    stat_line("Memory usage (MiB)", format!("{:.2}", allocated));
    stat_line("Resident memory (MiB)", format!("{:.2}", resident));
    println!("=====================================================================");
}
