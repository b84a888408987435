//! Bounded-horizon CNF encoding of a grounded planning problem.
//!
//! An [`Encoding`] holds the accumulated formula for "a valid plan of length
//! at most the current horizon exists". The horizon counts action slots:
//! horizon `H` has fluent layers `1..=H+1`, action steps `1..=H`, and goal
//! clauses targeting layer `H+1`. Growth is monotonic and additive: closing
//! a new transition only appends clauses, and clauses for transitions
//! already closed are never regenerated or removed. The goal clause set is
//! the one exception: it is rebuilt from scratch whenever the horizon
//! changes and is kept apart from the accumulated formula.
//!
//! Per transition `t` the encoder emits four clause families:
//!
//! 1. preconditions: firing action `a` at `t` forces each positive
//!    precondition true and each negative precondition false at `t`;
//! 2. effects: firing `a` at `t` forces each add effect true and each
//!    delete effect false at `t + 1`;
//! 3. mutual exclusion: at most one action fires per step (serial plans);
//! 4. explanatory frame axioms: a fluent that flips false-to-true across
//!    `t` requires some adder to have fired at `t`, and true-to-false some
//!    deleter; with no qualifying action, the fluent keeps its value.

use crate::planning::codec::{CodecOverflow, VarCodec};
use crate::planning::problem::Problem;
use crate::sat::solver::Clause;
use itertools::Itertools;
use smallvec::smallvec;

/// The CNF encoding of one problem, growable one horizon step at a time.
///
/// One encoding serves one solve attempt; it is owned by the search driver
/// for that attempt's lifetime and never shared.
#[derive(Debug, Clone)]
pub struct Encoding<'a> {
    problem: &'a Problem,
    /// Per fluent, the actions with that fluent among their add effects.
    adders: Vec<Vec<usize>>,
    /// Per fluent, the actions with that fluent among their delete effects.
    deleters: Vec<Vec<usize>>,
    codec: VarCodec,
    formula: Vec<Clause>,
    goal: Vec<Clause>,
    horizon: usize,
}

impl<'a> Encoding<'a> {
    /// Builds the encoding at `initial_horizon`: initial-state unit clauses
    /// at step 1, transition clauses for every step of the initial window,
    /// and goal clauses at the final layer. The codec is sized for the
    /// whole `step_ceiling` up front so that a misconfigured proposition or
    /// step space is rejected before any clause is emitted.
    ///
    /// # Errors
    ///
    /// Returns [`CodecOverflow`] when `step_ceiling + 1` layers over the
    /// problem's propositions cannot be numbered within `i32`.
    pub fn new(
        problem: &'a Problem,
        initial_horizon: usize,
        step_ceiling: usize,
    ) -> Result<Self, CodecOverflow> {
        let num_fluents = problem.num_fluents();
        let codec = VarCodec::new(
            num_fluents + problem.num_actions(),
            step_ceiling.max(initial_horizon) + 1,
        )?;

        let mut adders = vec![Vec::new(); num_fluents];
        let mut deleters = vec![Vec::new(); num_fluents];
        for (index, action) in problem.actions().iter().enumerate() {
            for &fluent in &action.pos_eff {
                adders[fluent].push(index);
            }
            for &fluent in &action.neg_eff {
                deleters[fluent].push(index);
            }
        }

        let mut encoding = Self {
            problem,
            adders,
            deleters,
            codec,
            formula: Vec::new(),
            goal: Vec::new(),
            horizon: initial_horizon,
        };

        for fluent in 0..num_fluents {
            let var = encoding.fluent_var(fluent, 1)?;
            encoding.formula.push(if problem.holds_initially(fluent) {
                smallvec![var]
            } else {
                smallvec![-var]
            });
        }
        encoding.extend_to(1, initial_horizon + 1)?;
        encoding.rebuild_goal()?;
        Ok(encoding)
    }

    /// Appends the transition clauses for every step `t` in `[from, to)`,
    /// referencing fluent layers up to `to`. Safe to call repeatedly with
    /// increasing windows; earlier steps' clauses are never touched.
    fn extend_to(&mut self, from: usize, to: usize) -> Result<(), CodecOverflow> {
        let problem = self.problem;
        let num_actions = problem.num_actions();
        for t in from..to {
            for (index, action) in problem.actions().iter().enumerate() {
                let fires = self.action_var(index, t)?;
                for &p in &action.pos_pre {
                    let pre = self.fluent_var(p, t)?;
                    self.formula.push(smallvec![-fires, pre]);
                }
                for &p in &action.neg_pre {
                    let pre = self.fluent_var(p, t)?;
                    self.formula.push(smallvec![-fires, -pre]);
                }
                for &e in &action.pos_eff {
                    let eff = self.fluent_var(e, t + 1)?;
                    self.formula.push(smallvec![-fires, eff]);
                }
                for &e in &action.neg_eff {
                    let eff = self.fluent_var(e, t + 1)?;
                    self.formula.push(smallvec![-fires, -eff]);
                }
            }

            for (a, b) in (0..num_actions).tuple_combinations() {
                let first = self.action_var(a, t)?;
                let second = self.action_var(b, t)?;
                self.formula.push(smallvec![-first, -second]);
            }

            for fluent in 0..problem.num_fluents() {
                let now = self.fluent_var(fluent, t)?;
                let next = self.fluent_var(fluent, t + 1)?;

                let mut gained: Clause = smallvec![now, -next];
                for index in 0..self.adders[fluent].len() {
                    let action = self.adders[fluent][index];
                    gained.push(self.action_var(action, t)?);
                }
                self.formula.push(gained);

                let mut lost: Clause = smallvec![-now, next];
                for index in 0..self.deleters[fluent].len() {
                    let action = self.deleters[fluent][index];
                    lost.push(self.action_var(action, t)?);
                }
                self.formula.push(lost);
            }
        }
        Ok(())
    }

    /// Rebuilds the goal clause set against the current final layer. Goal
    /// clauses are never merged into the accumulated formula.
    fn rebuild_goal(&mut self) -> Result<(), CodecOverflow> {
        self.goal.clear();
        let layer = self.horizon + 1;
        for literal in self.problem.goal() {
            let var = self.fluent_var(literal.fluent, layer)?;
            self.goal.push(if literal.positive {
                smallvec![var]
            } else {
                smallvec![-var]
            });
        }
        Ok(())
    }

    /// Opens one more action slot: closes the newly reachable transition and
    /// re-targets the goal clauses at the new final layer.
    ///
    /// # Errors
    ///
    /// Returns [`CodecOverflow`] when the new horizon exceeds the step
    /// ceiling the codec was sized for.
    pub fn grow(&mut self) -> Result<(), CodecOverflow> {
        self.horizon += 1;
        self.extend_to(self.horizon, self.horizon + 1)?;
        self.rebuild_goal()
    }

    /// The current horizon, in action slots.
    #[must_use]
    pub const fn horizon(&self) -> usize {
        self.horizon
    }

    /// The accumulated formula followed by the current goal clause set.
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.formula.iter().chain(self.goal.iter())
    }

    /// Total clause count, goal clauses included.
    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.formula.len() + self.goal.len()
    }

    /// The largest variable identifier the current window can reference.
    #[must_use]
    pub fn max_var(&self) -> i32 {
        let props = self.codec.num_props();
        if props == 0 {
            return 0;
        }
        self.codec
            .encode(props - 1, self.horizon + 1)
            .unwrap_or(i32::MAX)
    }

    /// The variable codec, shared with the plan extractor.
    #[must_use]
    pub const fn codec(&self) -> &VarCodec {
        &self.codec
    }

    fn fluent_var(&self, fluent: usize, step: usize) -> Result<i32, CodecOverflow> {
        self.codec.encode(fluent, step)
    }

    fn action_var(&self, action: usize, step: usize) -> Result<i32, CodecOverflow> {
        self.codec.encode(self.problem.num_fluents() + action, step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::problem::GroundAction;

    fn move_problem() -> Problem {
        let mut problem = Problem::new(vec!["at-A".into(), "at-B".into()]);
        problem.set_initial(0, true);
        problem.require_goal(1, true);
        problem.add_action(GroundAction {
            label: "move".into(),
            pos_pre: vec![0],
            neg_pre: vec![],
            pos_eff: vec![1],
            neg_eff: vec![0],
        });
        problem
    }

    fn two_action_problem() -> Problem {
        let mut problem = move_problem();
        problem.add_action(GroundAction {
            label: "stay".into(),
            pos_pre: vec![0],
            neg_pre: vec![1],
            pos_eff: vec![0],
            neg_eff: vec![],
        });
        problem
    }

    fn clause_set(encoding: &Encoding) -> Vec<Vec<i32>> {
        encoding
            .clauses()
            .map(|clause| clause.iter().copied().sorted().collect())
            .sorted()
            .collect()
    }

    #[test]
    fn initial_state_units_are_emitted_once_at_step_one() {
        let problem = move_problem();
        let encoding = Encoding::new(&problem, 0, 10).unwrap();
        let codec = encoding.codec();
        let at_a = codec.encode(0, 1).unwrap();
        let at_b = codec.encode(1, 1).unwrap();
        let units: Vec<Vec<i32>> = encoding
            .clauses()
            .filter(|c| c.len() == 1)
            .map(|c| c.to_vec())
            .collect();
        assert!(units.contains(&vec![at_a]));
        assert!(units.contains(&vec![-at_b]));
    }

    #[test]
    fn horizon_zero_has_no_transition_clauses() {
        let problem = move_problem();
        let encoding = Encoding::new(&problem, 0, 10).unwrap();
        // Two initial-state units plus one goal unit, nothing else.
        assert_eq!(encoding.num_clauses(), 3);
    }

    #[test]
    fn clause_families_have_the_expected_counts() {
        let problem = two_action_problem();
        let encoding = Encoding::new(&problem, 3, 10).unwrap();
        // Per transition: three pre/eff clauses for each action, one mutex
        // pair, two frame clauses per fluent.
        let per_step = 3 + 3 + 1 + 2 * 2;
        assert_eq!(encoding.num_clauses(), 2 + 3 * per_step + 1);
    }

    #[test]
    fn growth_is_monotonic_and_additive() {
        let problem = two_action_problem();
        for k in 1..5 {
            let direct = Encoding::new(&problem, k + 1, 10).unwrap();
            let mut grown = Encoding::new(&problem, k, 10).unwrap();
            grown.grow().unwrap();
            assert_eq!(grown.horizon(), direct.horizon());
            assert_eq!(clause_set(&grown), clause_set(&direct));
        }
    }

    #[test]
    fn goal_clauses_are_rebuilt_not_accumulated() {
        let mut problem = move_problem();
        problem.require_goal(0, false);
        let mut encoding = Encoding::new(&problem, 1, 10).unwrap();
        assert_eq!(encoding.goal.len(), 2);
        encoding.grow().unwrap();
        encoding.grow().unwrap();
        assert_eq!(encoding.goal.len(), 2);
        let layer = encoding.horizon() + 1;
        let at_b = encoding.codec().encode(1, layer).unwrap();
        let at_a = encoding.codec().encode(0, layer).unwrap();
        assert_eq!(encoding.goal[0].as_slice(), &[at_b]);
        assert_eq!(encoding.goal[1].as_slice(), &[-at_a]);
    }

    #[test]
    fn negative_goals_emit_negated_literals() {
        let mut problem = move_problem();
        problem.require_goal(0, false);
        let encoding = Encoding::new(&problem, 1, 10).unwrap();
        let at_a = encoding.codec().encode(0, 2).unwrap();
        assert!(encoding.goal.iter().any(|c| c.as_slice() == [-at_a]));
    }

    #[test]
    fn frame_axioms_name_every_adder_and_deleter() {
        let problem = two_action_problem();
        let encoding = Encoding::new(&problem, 1, 10).unwrap();
        let codec = encoding.codec();
        let at_a_1 = codec.encode(0, 1).unwrap();
        let at_a_2 = codec.encode(0, 2).unwrap();
        let move_1 = codec.encode(2, 1).unwrap();
        let stay_1 = codec.encode(3, 1).unwrap();
        // at-A gained: stays false unless `stay` re-adds it.
        let gained: Vec<i32> = vec![at_a_1, -at_a_2, stay_1];
        // at-A lost: stays true unless `move` deletes it.
        let lost: Vec<i32> = vec![-at_a_1, at_a_2, move_1];
        let clauses: Vec<Vec<i32>> = encoding.clauses().map(|c| c.to_vec()).collect();
        assert!(clauses.contains(&gained));
        assert!(clauses.contains(&lost));
    }

    #[test]
    fn growth_past_the_ceiling_is_a_codec_overflow() {
        let problem = move_problem();
        let mut encoding = Encoding::new(&problem, 2, 2).unwrap();
        assert!(encoding.grow().is_err());
    }
}
