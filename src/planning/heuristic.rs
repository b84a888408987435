//! Lower bounds on plan length, used to seed the starting horizon.

use crate::planning::problem::Problem;
use bit_vec::BitVec;

/// A pluggable lower bound on the number of action steps needed to reach
/// the goal. Any value ≥ 0 is valid; the search driver uses it verbatim as
/// the starting horizon.
pub trait HorizonEstimator {
    /// Lower bound on plan length for `problem`. `usize::MAX` signals that
    /// the goal is unreachable at any horizon.
    fn estimate(&self, problem: &Problem) -> usize;
}

/// Delete-relaxation reachability estimate.
///
/// Grows the set of reachable fluents by firing every action whose positive
/// preconditions are already reachable (negative preconditions and delete
/// effects are relaxed away), counting layers until every positive goal is
/// reachable and every negative goal is either initially false or deletable
/// by some reachable action. Reaching a fixpoint first means no plan exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelaxedReachability;

impl HorizonEstimator for RelaxedReachability {
    fn estimate(&self, problem: &Problem) -> usize {
        let mut reachable = problem.initial_state().clone();
        let mut deletable = BitVec::from_elem(problem.num_fluents(), false);
        let mut layers = 0;
        loop {
            if goal_met(problem, &reachable, &deletable) {
                return layers;
            }
            let mut next = reachable.clone();
            let mut next_deletable = deletable.clone();
            for action in problem.actions() {
                let applicable = action
                    .pos_pre
                    .iter()
                    .all(|&p| reachable.get(p) == Some(true));
                if applicable {
                    for &e in &action.pos_eff {
                        next.set(e, true);
                    }
                    for &e in &action.neg_eff {
                        next_deletable.set(e, true);
                    }
                }
            }
            if next == reachable && next_deletable == deletable {
                return usize::MAX;
            }
            reachable = next;
            deletable = next_deletable;
            layers += 1;
        }
    }
}

fn goal_met(problem: &Problem, reachable: &BitVec, deletable: &BitVec) -> bool {
    problem.goal().iter().all(|g| {
        if g.positive {
            reachable.get(g.fluent) == Some(true)
        } else {
            !problem.holds_initially(g.fluent) || deletable.get(g.fluent) == Some(true)
        }
    })
}
