//! Plans: ordered action sequences, plus validation by simulation.

use crate::planning::problem::Problem;

/// An ordered sequence of action indices, one per occupied step. Immutable
/// once extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan(Vec<usize>);

impl Plan {
    pub(crate) fn new(actions: Vec<usize>) -> Self {
        Self(actions)
    }

    /// Number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the plan is empty (the goal held initially).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The action indices, in execution order.
    #[must_use]
    pub fn actions(&self) -> &[usize] {
        &self.0
    }

    /// Simulates the plan from the problem's initial state using only the
    /// precondition/effect semantics, and checks that the reached state
    /// satisfies every goal literal.
    #[must_use]
    pub fn validate(&self, problem: &Problem) -> bool {
        let mut state = problem.initial_state().clone();
        for &index in &self.0 {
            let Some(action) = problem.actions().get(index) else {
                return false;
            };
            let applicable = action.pos_pre.iter().all(|&p| state.get(p) == Some(true))
                && action.neg_pre.iter().all(|&p| state.get(p) == Some(false));
            if !applicable {
                return false;
            }
            for &e in &action.neg_eff {
                state.set(e, false);
            }
            for &e in &action.pos_eff {
                state.set(e, true);
            }
        }
        problem
            .goal()
            .iter()
            .all(|g| state.get(g.fluent) == Some(g.positive))
    }

    /// Renders the plan as one `step: label` line per action.
    #[must_use]
    pub fn render(&self, problem: &Problem) -> String {
        self.0
            .iter()
            .enumerate()
            .map(|(step, &action)| format!("{}: {}\n", step + 1, problem.action_label(action)))
            .collect()
    }
}
