//! The typed outcome surface of a solve attempt.

use crate::planning::codec::CodecOverflow;
use crate::planning::extract::DecodeError;
use crate::sat::solver::EngineError;
use thiserror::Error;

/// Everything that can end a solve attempt without a plan.
///
/// None of these crash the host process; the caller decides what is fatal.
/// A partially built encoding behind any of them must be discarded, never
/// reused by a retry.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// The heuristic lower bound, or the grown horizon, exceeds the step
    /// ceiling: no plan within budget. Reported as "no plan found", not as
    /// a fault.
    #[error("no plan within the {ceiling}-step budget; at least {lower_bound} steps are necessary")]
    InfeasibleWithinBudget {
        /// The configured step ceiling.
        ceiling: usize,
        /// The smallest horizon that could still hold a plan
        /// (`usize::MAX` when the goal is unreachable outright).
        lower_bound: usize,
    },
    /// The SAT engine reported an internal error or timed out. The attempt
    /// is abandoned, not retried at the same horizon.
    #[error("SAT engine failed: {0}")]
    SolverFailure(#[from] EngineError),
    /// A satisfying model failed the extractor's consistency checks.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A (proposition, step) pair fell outside the codec's range.
    #[error(transparent)]
    Codec(#[from] CodecOverflow),
    /// The search was cancelled between solver calls.
    #[error("search cancelled")]
    Cancelled,
}
