//! Truth assignments over a variable range.

use crate::sat::solver::Model;

/// The state of one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarState {
    /// Not yet decided or propagated.
    #[default]
    Unassigned,
    /// Fixed to the carried truth value.
    Assigned(bool),
}

/// A partial truth assignment, indexed by variable. Index 0 is unused so
/// that variable identifiers map directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment(Vec<VarState>);

impl Assignment {
    /// All-unassigned over variables `1..=num_vars`.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![VarState::Unassigned; num_vars + 1])
    }

    /// Fixes a variable.
    pub fn assign(&mut self, var: usize, value: bool) {
        self.0[var] = VarState::Assigned(value);
    }

    /// The variable's value, if assigned.
    #[must_use]
    pub fn var_value(&self, var: usize) -> Option<bool> {
        match self.0.get(var) {
            Some(VarState::Assigned(value)) => Some(*value),
            _ => None,
        }
    }

    /// The literal's value under the current assignment, if its variable is
    /// assigned.
    #[must_use]
    pub fn literal_value(&self, literal: i32) -> Option<bool> {
        let value = self.var_value(literal.unsigned_abs() as usize)?;
        Some(if literal < 0 { !value } else { value })
    }

    /// Freezes the assignment into a model: one signed integer per
    /// variable, unassigned variables reported negative.
    #[must_use]
    pub fn to_model(&self) -> Model {
        (1..self.0.len())
            .map(|var| {
                let var = var as i32;
                match self.0[var as usize] {
                    VarState::Assigned(true) => var,
                    _ => -var,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_follow_their_sign() {
        let mut assignment = Assignment::new(3);
        assignment.assign(2, true);
        assert_eq!(assignment.literal_value(2), Some(true));
        assert_eq!(assignment.literal_value(-2), Some(false));
        assert_eq!(assignment.literal_value(1), None);
    }

    #[test]
    fn models_cover_every_declared_variable() {
        let mut assignment = Assignment::new(4);
        assignment.assign(1, true);
        assignment.assign(3, false);
        assert_eq!(assignment.to_model(), vec![1, -2, -3, -4]);
    }
}
