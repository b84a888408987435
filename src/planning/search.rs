//! The iterative-deepening search driver.
//!
//! Strict deepening with a step of one: start at the heuristic lower bound,
//! encode the bounded window, hand the full formula (accumulated clauses
//! plus the current goal set) to the SAT engine, and on UNSAT grow the
//! horizon and try again. The first satisfying model is decoded into a
//! plan. A fresh encoding is built per run and owned exclusively by the
//! driver for its duration; nothing is shared across concurrent attempts.

use crate::planning::encoder::Encoding;
use crate::planning::error::PlanningError;
use crate::planning::extract::extract_plan;
use crate::planning::heuristic::HorizonEstimator;
use crate::planning::plan::Plan;
use crate::planning::problem::Problem;
use crate::sat::solver::{SatEngine, Verdict};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Default horizon ceiling: searches give up past this many action slots.
pub const DEFAULT_STEP_CEILING: usize = 50;

/// Default wall-clock budget per satisfiability call.
pub const DEFAULT_SOLVER_TIMEOUT: Duration = Duration::from_secs(3600);

/// A cooperative cancellation flag, checked between solver calls (before
/// the next encoding phase), never mid-encoding.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A fresh, unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Search limits and cancellation.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// The horizon ceiling: pass it and the search reports no plan.
    pub step_ceiling: usize,
    /// Wall-clock budget handed to the SAT engine per call.
    pub solver_timeout: Duration,
    /// Cooperative cancellation flag.
    pub cancel: CancelFlag,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            step_ceiling: DEFAULT_STEP_CEILING,
            solver_timeout: DEFAULT_SOLVER_TIMEOUT,
            cancel: CancelFlag::new(),
        }
    }
}

/// Per-run bookkeeping, for reporting only.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Time spent building and extending the encoding.
    pub encode_time: Duration,
    /// Time spent inside the SAT engine.
    pub solve_time: Duration,
    /// Number of horizons submitted to the engine.
    pub horizons_tried: usize,
    /// The last horizon encoded.
    pub final_horizon: usize,
    /// Clause count of the last submitted formula.
    pub clauses: usize,
    /// Highest variable identifier of the last submitted formula.
    pub max_var: i32,
}

/// One solve attempt over one problem. Create, [`Search::run`], then read
/// [`Search::stats`].
#[derive(Debug)]
pub struct Search<'a, E> {
    problem: &'a Problem,
    engine: &'a mut E,
    config: SearchConfig,
    stats: SearchStats,
}

impl<'a, E: SatEngine> Search<'a, E> {
    /// Binds a problem to an engine under the given limits.
    pub fn new(problem: &'a Problem, engine: &'a mut E, config: SearchConfig) -> Self {
        Self {
            problem,
            engine,
            config,
            stats: SearchStats::default(),
        }
    }

    /// Runs the search to a terminal outcome: a plan, or a typed reason why
    /// none was produced.
    ///
    /// # Errors
    ///
    /// [`PlanningError::InfeasibleWithinBudget`] when the lower bound or the
    /// grown horizon passes the step ceiling;
    /// [`PlanningError::SolverFailure`] when the engine errors or times out;
    /// [`PlanningError::Decode`] and [`PlanningError::Codec`] on
    /// encoder/codec inconsistencies; [`PlanningError::Cancelled`] when the
    /// cancellation flag is raised between solver calls.
    pub fn run(&mut self, estimator: &dyn HorizonEstimator) -> Result<Plan, PlanningError> {
        let lower_bound = estimator.estimate(self.problem);
        if lower_bound > self.config.step_ceiling {
            return Err(PlanningError::InfeasibleWithinBudget {
                ceiling: self.config.step_ceiling,
                lower_bound,
            });
        }

        self.engine.set_timeout(self.config.solver_timeout);

        let started = Instant::now();
        let mut encoding = Encoding::new(self.problem, lower_bound, self.config.step_ceiling)?;
        self.stats.encode_time += started.elapsed();

        loop {
            if self.config.cancel.is_cancelled() {
                return Err(PlanningError::Cancelled);
            }

            // Each attempt submits the full current formula; resetting the
            // engine keeps clauses from leaking across horizons.
            self.engine.reset();
            self.engine.prepare(encoding.max_var(), encoding.num_clauses());
            for clause in encoding.clauses() {
                self.engine.add_clause(clause);
            }
            self.stats.horizons_tried += 1;
            self.stats.final_horizon = encoding.horizon();
            self.stats.clauses = encoding.num_clauses();
            self.stats.max_var = encoding.max_var();

            let started = Instant::now();
            let verdict = self.engine.solve();
            self.stats.solve_time += started.elapsed();

            match verdict? {
                Verdict::Satisfiable(model) => {
                    let plan = extract_plan(
                        &model,
                        encoding.codec(),
                        self.problem.num_fluents(),
                        self.problem.num_actions(),
                        encoding.horizon(),
                    )?;
                    return Ok(plan);
                }
                Verdict::Unsatisfiable => {
                    if encoding.horizon() == self.config.step_ceiling {
                        return Err(PlanningError::InfeasibleWithinBudget {
                            ceiling: self.config.step_ceiling,
                            lower_bound: self.config.step_ceiling + 1,
                        });
                    }
                    let started = Instant::now();
                    encoding.grow()?;
                    self.stats.encode_time += started.elapsed();
                }
            }
        }
    }

    /// Bookkeeping from the last run.
    #[must_use]
    pub const fn stats(&self) -> &SearchStats {
        &self.stats
    }
}
