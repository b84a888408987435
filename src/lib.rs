//! This crate implements planning as satisfiability: a grounded STRIPS-style
//! problem is compiled into a CNF formula for a bounded horizon, handed to a
//! SAT engine, and the horizon is grown one step at a time until a satisfying
//! model is found and decoded back into a plan.

/// The `planning` module holds the core of the planner: the grounded problem
/// model, the variable codec, the bounded CNF encoder, the plan extractor,
/// the horizon heuristic and the iterative-deepening search driver.
pub mod planning;

/// The `sat` module holds the satisfiability side: the engine interface the
/// search driver talks to, a built-in DPLL backend, and a DIMACS writer.
pub mod sat;
