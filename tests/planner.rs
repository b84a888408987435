//! End-to-end tests: problem text in, plan (or typed failure) out.

use satplan::planning::{
    HorizonEstimator, PlanningError, Problem, RelaxedReachability, Search, SearchConfig,
    parse_problem,
};
use satplan::sat::Dpll;

const MOVE: &str = "\
# rover moves from A to B
fluents: at-A at-B
init: at-A
goal: at-B
action move
pre: at-A
del: at-A
add: at-B
";

/// An estimator pinned to a constant, for exercising the deepening loop.
struct FixedEstimate(usize);

impl HorizonEstimator for FixedEstimate {
    fn estimate(&self, _: &Problem) -> usize {
        self.0
    }
}

fn solve(problem: &Problem, config: SearchConfig) -> Result<satplan::planning::Plan, PlanningError> {
    let mut engine = Dpll::new();
    Search::new(problem, &mut engine, config).run(&RelaxedReachability)
}

/// A chain of `n` fluents, each link consumed by the action that produces
/// the next one. The shortest plan has exactly `n` steps.
fn chain(n: usize) -> Problem {
    let mut text = String::new();
    text.push_str("fluents:");
    for i in 0..=n {
        text.push_str(&format!(" p{i}"));
    }
    text.push_str("\ninit: p0\n");
    text.push_str(&format!("goal: p{n}\n"));
    for i in 1..=n {
        text.push_str(&format!(
            "action step{i}\npre: p{}\ndel: p{}\nadd: p{i}\n",
            i - 1,
            i - 1
        ));
    }
    parse_problem(&text).unwrap()
}

#[test]
fn solves_the_move_problem_in_one_step() {
    let problem = parse_problem(MOVE).unwrap();
    let mut engine = Dpll::new();
    let mut search = Search::new(&problem, &mut engine, SearchConfig::default());
    let plan = search.run(&RelaxedReachability).unwrap();

    assert_eq!(plan.len(), 1);
    assert_eq!(problem.action_label(plan.actions()[0]), "move");
    assert!(plan.validate(&problem));
    assert_eq!(plan.render(&problem), "1: move\n");
    assert_eq!(search.stats().final_horizon, 1);
}

#[test]
fn chains_need_one_step_per_link() {
    for n in 1..5 {
        let problem = chain(n);
        let plan = solve(&problem, SearchConfig::default()).unwrap();
        assert_eq!(plan.len(), n);
        assert!(plan.validate(&problem));
    }
}

#[test]
fn negative_goal_literals_are_honored() {
    let text = "\
fluents: lamp-on
init: lamp-on
goal: -lamp-on
action switch-off
pre: lamp-on
del: lamp-on
";
    let problem = parse_problem(text).unwrap();
    let plan = solve(&problem, SearchConfig::default()).unwrap();
    assert_eq!(plan.len(), 1);
    assert!(plan.validate(&problem));
}

#[test]
fn a_goal_with_no_producer_exhausts_the_budget() {
    // The goal fluent has no adder, so the frame axioms keep it false at
    // every layer and each horizon comes back UNSAT.
    let text = "\
fluents: here there
init: here
goal: there
action wait
pre: here
add: here
";
    let problem = parse_problem(text).unwrap();
    let config = SearchConfig {
        step_ceiling: 3,
        ..SearchConfig::default()
    };
    let mut engine = Dpll::new();
    let mut search = Search::new(&problem, &mut engine, config);
    let err = search.run(&FixedEstimate(0)).unwrap_err();
    assert!(matches!(
        err,
        PlanningError::InfeasibleWithinBudget {
            ceiling: 3,
            lower_bound: 4
        }
    ));
    assert_eq!(search.stats().horizons_tried, 4);
}

#[test]
fn relaxed_unreachable_goals_fail_before_any_encoding() {
    let text = "\
fluents: here there
init: here
goal: there
action wait
pre: here
add: here
";
    let problem = parse_problem(text).unwrap();
    let mut engine = Dpll::new();
    let mut search = Search::new(&problem, &mut engine, SearchConfig::default());
    let err = search.run(&RelaxedReachability).unwrap_err();
    assert!(matches!(
        err,
        PlanningError::InfeasibleWithinBudget {
            lower_bound: usize::MAX,
            ..
        }
    ));
    assert_eq!(search.stats().horizons_tried, 0);
}

#[test]
fn re_solving_the_same_problem_reproduces_the_plan() {
    let problem = chain(3);
    let first = solve(&problem, SearchConfig::default()).unwrap();
    let second = solve(&problem, SearchConfig::default()).unwrap();
    assert_eq!(first.actions(), second.actions());
}

#[test]
fn a_goal_that_already_holds_needs_no_actions() {
    let text = "\
fluents: done
init: done
goal: done
action redo
pre: done
add: done
";
    let problem = parse_problem(text).unwrap();
    let mut engine = Dpll::new();
    let mut search = Search::new(&problem, &mut engine, SearchConfig::default());
    let plan = search.run(&RelaxedReachability).unwrap();
    assert!(plan.is_empty());
    assert!(plan.validate(&problem));
    assert_eq!(search.stats().final_horizon, 0);
}

#[test]
fn a_cancelled_search_never_reaches_the_engine() {
    let problem = parse_problem(MOVE).unwrap();
    let config = SearchConfig::default();
    config.cancel.cancel();
    let mut engine = Dpll::new();
    let mut search = Search::new(&problem, &mut engine, config);
    let err = search.run(&RelaxedReachability).unwrap_err();
    assert!(matches!(err, PlanningError::Cancelled));
    assert_eq!(search.stats().horizons_tried, 0);
}

#[test]
fn mutex_clauses_keep_plans_serial() {
    // Two independent goals, two independent actions. A serial encoding
    // cannot reach both in one step, so the plan must have two.
    let text = "\
fluents: a b
goal: a b
action make-a
add: a
action make-b
add: b
";
    let problem = parse_problem(text).unwrap();
    let plan = solve(&problem, SearchConfig::default()).unwrap();
    assert_eq!(plan.len(), 2);
    assert!(plan.validate(&problem));
}
