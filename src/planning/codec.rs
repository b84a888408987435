//! Bijective numbering of (proposition, time step) pairs as SAT variables.
//!
//! The encoder talks to the SAT engine in terms of positive integer variable
//! identifiers, but thinks in terms of a proposition index (a fluent, or an
//! "action fires" proposition) at a time step. `VarCodec` is the bijection
//! between the two views: `decode(encode(p, s)) == (p, s)` for every pair the
//! encoder uses. The pairing is Cantor's, computed in `u64` with an
//! integer-exact inverse; no floating point is involved, so the round trip
//! cannot drift near integer boundaries.

use thiserror::Error;

/// A (proposition, step) pair fell outside the range the codec was sized for.
///
/// This fires before any clause is emitted for the offending pair: it means
/// the step ceiling or the proposition space was misconfigured, and the
/// current encoding must be discarded rather than retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "proposition {prop} at step {step} is outside the codec range \
     ({num_props} propositions, {max_step} steps)"
)]
pub struct CodecOverflow {
    /// The offending proposition index.
    pub prop: usize,
    /// The offending time step.
    pub step: usize,
    /// The number of propositions the codec was sized for.
    pub num_props: usize,
    /// The highest step the codec was sized for.
    pub max_step: usize,
}

/// Bijection between (proposition index, time step) pairs and SAT variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarCodec {
    num_props: usize,
    max_step: usize,
}

impl VarCodec {
    /// Creates a codec sized for proposition indices in `[0, num_props)` and
    /// steps in `[1, max_step]`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecOverflow`] if the largest encodable pair does not fit
    /// in an `i32` variable identifier, so misconfiguration is caught before
    /// a single clause is emitted.
    pub fn new(num_props: usize, max_step: usize) -> Result<Self, CodecOverflow> {
        let codec = Self {
            num_props,
            max_step,
        };
        if num_props > 0 && max_step > 0 {
            codec.encode(num_props - 1, max_step)?;
        }
        Ok(codec)
    }

    /// Packs a (proposition, step) pair into a positive SAT variable.
    ///
    /// # Errors
    ///
    /// Returns [`CodecOverflow`] when the pair is outside the configured
    /// range. Within the range this can never fail once [`VarCodec::new`]
    /// has accepted the configuration.
    pub fn encode(&self, prop: usize, step: usize) -> Result<i32, CodecOverflow> {
        if prop >= self.num_props || step == 0 || step > self.max_step {
            return Err(self.overflow(prop, step));
        }
        let s = (prop + step) as u64;
        let packed = s * (s + 1) / 2 + step as u64;
        i32::try_from(packed).map_err(|_| self.overflow(prop, step))
    }

    /// Unpacks a SAT variable back into its (proposition, step) pair.
    ///
    /// The inverse search is integer-exact: a `u64` square root seeds the
    /// diagonal index, which is then corrected by at most one in either
    /// direction.
    #[must_use]
    pub fn decode(&self, var: i32) -> (usize, usize) {
        debug_assert!(var > 0, "SAT variables are positive");
        let z = var as u64;
        let mut t = (8 * z + 1).isqrt().saturating_sub(1) / 2;
        while (t + 1) * (t + 2) / 2 <= z {
            t += 1;
        }
        while t * (t + 1) / 2 > z {
            t -= 1;
        }
        let step = z - t * (t + 1) / 2;
        let prop = t - step;
        (prop as usize, step as usize)
    }

    /// The number of propositions this codec was sized for.
    #[must_use]
    pub const fn num_props(&self) -> usize {
        self.num_props
    }

    /// The highest step this codec was sized for.
    #[must_use]
    pub const fn max_step(&self) -> usize {
        self.max_step
    }

    const fn overflow(&self, prop: usize, step: usize) -> CodecOverflow {
        CodecOverflow {
            prop,
            step,
            num_props: self.num_props,
            max_step: self.max_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn round_trip_over_full_range() {
        let codec = VarCodec::new(60, 40).unwrap();
        for prop in 0..60 {
            for step in 1..=40 {
                let var = codec.encode(prop, step).unwrap();
                assert!(var > 0);
                assert_eq!(codec.decode(var), (prop, step));
            }
        }
    }

    #[test]
    fn encoding_is_injective() {
        let codec = VarCodec::new(30, 20).unwrap();
        let mut seen = HashSet::new();
        for prop in 0..30 {
            for step in 1..=20 {
                assert!(seen.insert(codec.encode(prop, step).unwrap()));
            }
        }
    }

    #[test]
    fn round_trip_random_pairs() {
        let codec = VarCodec::new(5000, 5000).unwrap();
        for _ in 0..2000 {
            let prop = fastrand::usize(0..5000);
            let step = fastrand::usize(1..=5000);
            let var = codec.encode(prop, step).unwrap();
            assert_eq!(codec.decode(var), (prop, step));
        }
    }

    #[test]
    fn rejects_out_of_range_pairs() {
        let codec = VarCodec::new(10, 5).unwrap();
        assert!(codec.encode(10, 1).is_err());
        assert!(codec.encode(0, 0).is_err());
        assert!(codec.encode(0, 6).is_err());
        assert!(codec.encode(9, 5).is_ok());
    }

    #[test]
    fn rejects_configurations_past_i32() {
        // The largest pair packs past i32::MAX, so construction must fail.
        assert!(VarCodec::new(100_000, 100_000).is_err());
        assert!(VarCodec::new(60_000, 50).is_ok());
    }

    #[test]
    fn decode_is_exact_near_the_top_of_the_range() {
        let codec = VarCodec::new(65_000, 400).unwrap();
        for prop in 64_990..65_000 {
            for step in 395..=400 {
                let var = codec.encode(prop, step).unwrap();
                assert_eq!(codec.decode(var), (prop, step));
            }
        }
    }
}
