//! The planning core.
//!
//! A [`problem::Problem`] describes fluents, grounded actions, an initial
//! state and a goal. [`encoder::Encoding`] compiles it into CNF clauses for a
//! bounded horizon, numbering variables through [`codec::VarCodec`].
//! [`search::Search`] grows the horizon one step at a time, delegating each
//! satisfiability check to a [`crate::sat::solver::SatEngine`], and
//! [`extract::extract_plan`] decodes a satisfying model into a [`plan::Plan`].

pub mod codec;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod heuristic;
pub mod plan;
pub mod problem;
pub mod search;

pub use codec::VarCodec;
pub use encoder::Encoding;
pub use error::PlanningError;
pub use heuristic::{HorizonEstimator, RelaxedReachability};
pub use plan::Plan;
pub use problem::{GoalLiteral, GroundAction, Problem, parse_problem, parse_problem_file};
pub use search::{CancelFlag, Search, SearchConfig, SearchStats};
