//! The satisfiability side of the planner.

pub mod assignment;
pub mod dimacs;
pub mod dpll;
pub mod solver;

pub use dpll::Dpll;
pub use solver::{Clause, EngineError, Model, SatEngine, Verdict};
