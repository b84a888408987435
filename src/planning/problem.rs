//! The grounded planning problem the encoder reads.
//!
//! A problem is fully propositional: fluents are Boolean propositions
//! identified by their index, actions are grounded operators whose
//! preconditions and effects are fluent index sets, the initial state is a
//! truth vector over the fluents and the goal is a list of polarity-tagged
//! fluent literals. Parsing and grounding a full planning language is out of
//! scope; problems are built programmatically or read from the line-oriented
//! text format understood by [`parse_problem`].

use bit_vec::BitVec;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// A grounded operator: all parameters bound, preconditions and effects as
/// fluent index sets. Effects are unconditional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroundAction {
    /// Human-readable label, used only for plan reporting.
    pub label: String,
    /// Fluents that must hold true for the action to be applicable.
    pub pos_pre: Vec<usize>,
    /// Fluents that must hold false for the action to be applicable.
    pub neg_pre: Vec<usize>,
    /// Fluents forced true one step after the action fires.
    pub pos_eff: Vec<usize>,
    /// Fluents forced false one step after the action fires.
    pub neg_eff: Vec<usize>,
}

impl GroundAction {
    /// Creates an action with the given label and no preconditions or
    /// effects.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

/// One goal requirement: a fluent that must hold with the given polarity in
/// the final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalLiteral {
    /// The constrained fluent.
    pub fluent: usize,
    /// `true` if the fluent must hold, `false` if it must not.
    pub positive: bool,
}

/// A grounded planning problem. Read-only to the encoder and search driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    fluents: Vec<String>,
    init: BitVec,
    goal: Vec<GoalLiteral>,
    actions: Vec<GroundAction>,
}

impl Problem {
    /// Creates a problem over the given fluents, all initially false, with an
    /// empty goal and no actions.
    #[must_use]
    pub fn new(fluents: Vec<String>) -> Self {
        let init = BitVec::from_elem(fluents.len(), false);
        Self {
            fluents,
            init,
            goal: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Number of fluents.
    #[must_use]
    pub fn num_fluents(&self) -> usize {
        self.fluents.len()
    }

    /// Number of grounded actions.
    #[must_use]
    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    /// Sets a fluent's initial truth value.
    pub fn set_initial(&mut self, fluent: usize, value: bool) {
        self.init.set(fluent, value);
    }

    /// Adds a goal requirement.
    pub fn require_goal(&mut self, fluent: usize, positive: bool) {
        debug_assert!(fluent < self.fluents.len());
        self.goal.push(GoalLiteral { fluent, positive });
    }

    /// Adds a grounded action, returning its index.
    pub fn add_action(&mut self, action: GroundAction) -> usize {
        self.actions.push(action);
        self.actions.len() - 1
    }

    /// The initial truth vector over the fluents.
    #[must_use]
    pub fn initial_state(&self) -> &BitVec {
        &self.init
    }

    /// Whether a fluent holds in the initial state.
    #[must_use]
    pub fn holds_initially(&self, fluent: usize) -> bool {
        self.init.get(fluent) == Some(true)
    }

    /// The goal literal list.
    #[must_use]
    pub fn goal(&self) -> &[GoalLiteral] {
        &self.goal
    }

    /// The grounded action list.
    #[must_use]
    pub fn actions(&self) -> &[GroundAction] {
        &self.actions
    }

    /// The label of a fluent.
    #[must_use]
    pub fn fluent_label(&self, fluent: usize) -> &str {
        &self.fluents[fluent]
    }

    /// The label of an action.
    #[must_use]
    pub fn action_label(&self, action: usize) -> &str {
        &self.actions[action].label
    }
}

/// A problem file failed to parse.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A fluent name was used before being declared on a `fluents:` line.
    #[error("line {line}: unknown fluent `{name}`")]
    UnknownFluent {
        /// 1-based source line.
        line: usize,
        /// The undeclared name.
        name: String,
    },
    /// A fluent name was declared twice.
    #[error("line {line}: duplicate fluent `{name}`")]
    DuplicateFluent {
        /// 1-based source line.
        line: usize,
        /// The repeated name.
        name: String,
    },
    /// An action-scoped directive appeared before any `action` line.
    #[error("line {line}: `{directive}` before any `action`")]
    OutsideAction {
        /// 1-based source line.
        line: usize,
        /// The offending directive.
        directive: String,
    },
    /// An unrecognized directive.
    #[error("line {line}: unrecognized directive `{directive}`")]
    UnknownDirective {
        /// 1-based source line.
        line: usize,
        /// The offending directive.
        directive: String,
    },
    /// The file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parses the line-oriented grounded problem format.
///
/// ```text
/// # rover moves from A to B
/// fluents: at-A at-B
/// init: at-A
/// goal: at-B
/// action move
/// pre: at-A
/// del: at-A
/// add: at-B
/// ```
///
/// `fluents:` lines declare names (and may repeat to extend the set);
/// `init:` lists fluents true initially; `goal:` lists required fluents,
/// with a `-` prefix for required-false; `action <label>` opens an action
/// block whose `pre:`, `pre-not:`, `add:` and `del:` lines accumulate until
/// the next block. `#` starts a comment.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first offending line.
pub fn parse_problem(input: &str) -> Result<Problem, ParseError> {
    let mut names: FxHashMap<String, usize> = FxHashMap::default();
    let mut fluents: Vec<String> = Vec::new();
    let mut init: Vec<usize> = Vec::new();
    let mut goal: Vec<GoalLiteral> = Vec::new();
    let mut actions: Vec<GroundAction> = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }

        let (directive, rest) = match text.split_once(char::is_whitespace) {
            Some((head, tail)) => (head, tail.trim()),
            None => (text, ""),
        };

        match directive {
            "fluents:" => {
                for name in rest.split_whitespace() {
                    if names.contains_key(name) {
                        return Err(ParseError::DuplicateFluent {
                            line,
                            name: name.to_string(),
                        });
                    }
                    names.insert(name.to_string(), fluents.len());
                    fluents.push(name.to_string());
                }
            }
            "init:" => {
                for name in rest.split_whitespace() {
                    init.push(lookup(&names, name, line)?);
                }
            }
            "goal:" => {
                for name in rest.split_whitespace() {
                    let (name, positive) = match name.strip_prefix('-') {
                        Some(stripped) => (stripped, false),
                        None => (name, true),
                    };
                    goal.push(GoalLiteral {
                        fluent: lookup(&names, name, line)?,
                        positive,
                    });
                }
            }
            "action" => actions.push(GroundAction::new(rest)),
            "pre:" | "pre-not:" | "add:" | "del:" => {
                let Some(action) = actions.last_mut() else {
                    return Err(ParseError::OutsideAction {
                        line,
                        directive: directive.to_string(),
                    });
                };
                let indices: Vec<usize> = rest
                    .split_whitespace()
                    .map(|name| lookup(&names, name, line))
                    .try_collect()?;
                let set = match directive {
                    "pre:" => &mut action.pos_pre,
                    "pre-not:" => &mut action.neg_pre,
                    "add:" => &mut action.pos_eff,
                    _ => &mut action.neg_eff,
                };
                set.extend(indices);
            }
            _ => {
                return Err(ParseError::UnknownDirective {
                    line,
                    directive: directive.to_string(),
                });
            }
        }
    }

    let mut problem = Problem::new(fluents);
    for fluent in init {
        problem.set_initial(fluent, true);
    }
    for literal in goal {
        problem.require_goal(literal.fluent, literal.positive);
    }
    for action in actions {
        problem.add_action(action);
    }
    Ok(problem)
}

/// Reads and parses a problem file.
///
/// # Errors
///
/// Returns a [`ParseError`] if the file cannot be read or fails to parse.
pub fn parse_problem_file(path: &str) -> Result<Problem, ParseError> {
    parse_problem(&std::fs::read_to_string(path)?)
}

fn lookup(names: &FxHashMap<String, usize>, name: &str, line: usize) -> Result<usize, ParseError> {
    names
        .get(name)
        .copied()
        .ok_or_else(|| ParseError::UnknownFluent {
            line,
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVE: &str = "\
# rover moves from A to B
fluents: at-A at-B
init: at-A
goal: at-B -at-A
action move
pre: at-A
del: at-A
add: at-B
";

    #[test]
    fn parses_the_move_problem() {
        let problem = parse_problem(MOVE).unwrap();
        assert_eq!(problem.num_fluents(), 2);
        assert_eq!(problem.num_actions(), 1);
        assert!(problem.holds_initially(0));
        assert!(!problem.holds_initially(1));
        assert_eq!(
            problem.goal(),
            &[
                GoalLiteral {
                    fluent: 1,
                    positive: true
                },
                GoalLiteral {
                    fluent: 0,
                    positive: false
                }
            ]
        );
        let action = &problem.actions()[0];
        assert_eq!(action.label, "move");
        assert_eq!(action.pos_pre, vec![0]);
        assert_eq!(action.neg_eff, vec![0]);
        assert_eq!(action.pos_eff, vec![1]);
    }

    #[test]
    fn rejects_unknown_fluents() {
        let err = parse_problem("fluents: a\ninit: b\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnknownFluent { line: 2, ref name } if name == "b"
        ));
    }

    #[test]
    fn rejects_duplicate_fluents() {
        let err = parse_problem("fluents: a a\n").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateFluent { line: 1, .. }));
    }

    #[test]
    fn rejects_effects_outside_an_action() {
        let err = parse_problem("fluents: a\nadd: a\n").unwrap_err();
        assert!(matches!(err, ParseError::OutsideAction { line: 2, .. }));
    }

    #[test]
    fn rejects_unknown_directives() {
        let err = parse_problem("fluents: a\nwhen: a\n").unwrap_err();
        assert!(matches!(err, ParseError::UnknownDirective { line: 2, .. }));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let problem = parse_problem("\n# nothing\nfluents: a # trailing\ninit: a\n").unwrap();
        assert_eq!(problem.num_fluents(), 1);
        assert!(problem.holds_initially(0));
    }
}
