//! The engine interface the search driver talks to.
//!
//! The driver treats satisfiability as an opaque blocking call: it loads a
//! flat collection of clauses, asks for a verdict, and either receives a
//! model (one signed integer per declared variable, sign giving the truth
//! value) or learns the formula is unsatisfiable. Engines must support
//! being reset and reused across horizon attempts without leaking clauses
//! from one attempt into the next.

use smallvec::SmallVec;
use std::time::Duration;
use thiserror::Error;

/// A disjunction of signed, non-zero SAT literals.
pub type Clause = SmallVec<[i32; 8]>;

/// A satisfying assignment: one signed integer per declared variable.
pub type Model = Vec<i32>;

/// The definitive answer of a satisfiability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The formula is satisfiable; here is a model.
    Satisfiable(Model),
    /// The formula is unsatisfiable.
    Unsatisfiable,
}

/// The engine could not produce a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The solve call exceeded its configured timeout.
    #[error("solve exceeded the {0:?} timeout")]
    Timeout(Duration),
    /// Backend-specific failure.
    #[error("internal solver error: {0}")]
    Internal(String),
}

/// A blocking satisfiability engine.
pub trait SatEngine {
    /// Drops all clauses from the previous attempt.
    fn reset(&mut self);

    /// Configures the wall-clock budget for subsequent [`SatEngine::solve`]
    /// calls.
    fn set_timeout(&mut self, timeout: Duration);

    /// Declares the variable range and expected clause count of the next
    /// attempt, ahead of ingestion.
    fn prepare(&mut self, max_var: i32, expected_clauses: usize);

    /// Ingests one clause. Literal magnitudes must stay within the declared
    /// variable range.
    fn add_clause(&mut self, literals: &[i32]);

    /// Blocks until a verdict or a failure. A timeout is a failure, not a
    /// verdict; the caller decides whether to retry.
    fn solve(&mut self) -> Result<Verdict, EngineError>;
}
