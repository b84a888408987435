//! The built-in DPLL (Davis-Putnam-Logemann-Loveland) backend.
//!
//! A classical recursive DPLL with unit propagation: propagate unit clauses
//! to a fixpoint, detect conflicts, otherwise branch on the first
//! unassigned variable of the first unsatisfied clause, trying `true` then
//! `false`. Branching is deterministic, so repeated solves of the same
//! formula return the same model, which in turn makes re-solves of the
//! same planning problem reproducible.
//!
//! This backend favors clarity over raw throughput; the planner treats it
//! like any other [`SatEngine`], and a conflict-driven engine can be swapped
//! in behind the same trait.

use crate::sat::assignment::Assignment;
use crate::sat::solver::{Clause, EngineError, SatEngine, Verdict};
use std::time::{Duration, Instant};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// A DPLL engine. Reusable across attempts via [`SatEngine::reset`].
#[derive(Debug, Clone)]
pub struct Dpll {
    clauses: Vec<Clause>,
    num_vars: usize,
    timeout: Duration,
}

impl Dpll {
    /// An empty engine with the default one-hour timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
            num_vars: 0,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Propagates, then branches. Returns the extended assignment if the
    /// formula is satisfiable from `assignment`, `None` if not.
    fn search(
        &self,
        mut assignment: Assignment,
        deadline: Instant,
    ) -> Result<Option<Assignment>, EngineError> {
        if Instant::now() >= deadline {
            return Err(EngineError::Timeout(self.timeout));
        }

        // Unit propagation to a fixpoint.
        loop {
            let mut progressed = false;
            for clause in &self.clauses {
                let mut satisfied = false;
                let mut unassigned = None;
                let mut open = 0;
                for &literal in clause {
                    match assignment.literal_value(literal) {
                        Some(true) => {
                            satisfied = true;
                            break;
                        }
                        Some(false) => {}
                        None => {
                            open += 1;
                            unassigned = Some(literal);
                        }
                    }
                }
                if satisfied {
                    continue;
                }
                match (open, unassigned) {
                    (0, _) => return Ok(None),
                    (1, Some(literal)) => {
                        assignment.assign(literal.unsigned_abs() as usize, literal > 0);
                        progressed = true;
                    }
                    _ => {}
                }
            }
            if !progressed {
                break;
            }
        }

        // Pick the first open literal of the first unsatisfied clause; if
        // every clause is satisfied the assignment is a model.
        let mut branch_var = None;
        'clauses: for clause in &self.clauses {
            let mut open = None;
            for &literal in clause {
                match assignment.literal_value(literal) {
                    Some(true) => continue 'clauses,
                    Some(false) => {}
                    None => open = open.or(Some(literal.unsigned_abs() as usize)),
                }
            }
            branch_var = open;
            break;
        }
        let Some(var) = branch_var else {
            return Ok(Some(assignment));
        };

        for value in [true, false] {
            let mut branch = assignment.clone();
            branch.assign(var, value);
            if let Some(model) = self.search(branch, deadline)? {
                return Ok(Some(model));
            }
        }
        Ok(None)
    }
}

impl Default for Dpll {
    fn default() -> Self {
        Self::new()
    }
}

impl SatEngine for Dpll {
    fn reset(&mut self) {
        self.clauses.clear();
        self.num_vars = 0;
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    fn prepare(&mut self, max_var: i32, expected_clauses: usize) {
        self.num_vars = usize::try_from(max_var).unwrap_or(0);
        self.clauses
            .reserve(expected_clauses.saturating_sub(self.clauses.len()));
    }

    fn add_clause(&mut self, literals: &[i32]) {
        debug_assert!(
            literals
                .iter()
                .all(|l| *l != 0 && l.unsigned_abs() as usize <= self.num_vars)
        );
        self.clauses.push(Clause::from_slice(literals));
    }

    fn solve(&mut self) -> Result<Verdict, EngineError> {
        let deadline = Instant::now() + self.timeout;
        let assignment = Assignment::new(self.num_vars);
        Ok(match self.search(assignment, deadline)? {
            Some(model) => Verdict::Satisfiable(model.to_model()),
            None => Verdict::Unsatisfiable,
        })
    }
}
