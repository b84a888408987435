//! Decoding a satisfying model into a plan.
//!
//! The model assigns every SAT variable a sign. Positive literals whose
//! decoded proposition falls in the action band `[F, F+A)` mark "action
//! fires at this step". Steps with no asserted action are legal wait steps
//! and are omitted from the plan; two actions claiming the same step, or an
//! action outside the encoded window, mean the formula does not match the
//! codec's assumptions and extraction fails.

use crate::planning::codec::VarCodec;
use crate::planning::plan::Plan;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// A satisfying model violated the extractor's step-ownership checks.
///
/// This is a programming-invariant violation, fatal to the current solve:
/// the encoder, codec and solver no longer agree on what the variables mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Two distinct actions were asserted at the same step, which the
    /// mutual-exclusion clauses should have made impossible.
    #[error("actions {first} and {second} both asserted at step {step}")]
    ConflictingActions {
        /// The contested step.
        step: usize,
        /// The action already occupying the step.
        first: usize,
        /// The action also claiming it.
        second: usize,
    },
    /// An action proposition was asserted outside the encoded window.
    #[error("action {action} asserted at step {step}, outside the 1..={horizon} window")]
    StepOutOfRange {
        /// The asserted action.
        action: usize,
        /// The step it claimed.
        step: usize,
        /// The current horizon.
        horizon: usize,
    },
}

/// Decodes a model into the ordered action sequence it asserts.
///
/// Proposition ids at or beyond `num_fluents + num_actions` are padding
/// variables the encoder never constrained; they are ignored whatever the
/// solver assigned them.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the model asserts two actions at one step
/// or an action outside `1..=horizon`.
pub fn extract_plan(
    model: &[i32],
    codec: &VarCodec,
    num_fluents: usize,
    num_actions: usize,
    horizon: usize,
) -> Result<Plan, DecodeError> {
    let mut by_step: FxHashMap<usize, usize> = FxHashMap::default();
    for &literal in model {
        if literal <= 0 {
            continue;
        }
        let (prop, step) = codec.decode(literal);
        if prop < num_fluents || prop >= num_fluents + num_actions {
            continue;
        }
        let action = prop - num_fluents;
        if step == 0 || step > horizon {
            return Err(DecodeError::StepOutOfRange {
                action,
                step,
                horizon,
            });
        }
        if let Some(&first) = by_step.get(&step) {
            if first != action {
                return Err(DecodeError::ConflictingActions {
                    step,
                    first,
                    second: action,
                });
            }
        } else {
            by_step.insert(step, action);
        }
    }

    let actions = by_step
        .into_iter()
        .sorted_by_key(|&(step, _)| step)
        .map(|(_, action)| action)
        .collect();
    Ok(Plan::new(actions))
}
