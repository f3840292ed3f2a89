//! SR Latch
//!
//! A level-sensitive set/reset latch with outputs `[Q, Q̄]`.
//!
//! | S | R | Q            |
//! |---|---|--------------|
//! | 1 | 0 | 1            |
//! | 0 | 1 | 0            |
//! | 0 | 0 | previous Q   |
//! | 1 | 1 | conflict     |
//!
//! A conflict yields `Unset`, unless the latch is configured to stabilize,
//! in which case it keeps the previous Q. The synchronous variant has a
//! third input, the enable: while it is low, the latch holds regardless of
//! S and R.
//!
//! A NAND-based latch takes active-low inputs (`S̄`, `R̄`); they are inverted
//! before the table above is applied.

use serde::{Deserialize, Serialize};

use super::pin;
use crate::logic::TriState;

/// The gate a latch is built from, which decides input polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LatchGate {
    /// Active-high S and R.
    #[default]
    Nor,
    /// Active-low S̄ and R̄.
    Nand,
}

/// Parameters of an SR latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LatchParams {
    /// Add an enable input and only react while it is high.
    pub sync: bool,
    /// On conflict, hold the previous value instead of going unset.
    pub stabilize: bool,
    pub gate: LatchGate,
}

/// An SR latch instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrLatch {
    params: LatchParams,
    state: TriState,
}

impl SrLatch {
    pub const SET: usize = 0;
    pub const RESET: usize = 1;
    /// Only present on the synchronous variant.
    pub const ENABLE: usize = 2;

    pub fn new(params: LatchParams) -> Self {
        Self {
            params,
            state: TriState::False,
        }
    }

    pub fn params(&self) -> LatchParams {
        self.params
    }

    /// The stored Q value.
    pub fn state(&self) -> TriState {
        self.state
    }

    pub fn num_inputs(&self) -> usize {
        if self.params.sync {
            3
        } else {
            2
        }
    }

    /// Compute the new Q from S, R (and enable), and store it.
    pub fn recompute(&mut self, inputs: &[TriState]) -> TriState {
        if self.params.sync {
            match pin(inputs, Self::ENABLE) {
                TriState::False => return self.state,
                TriState::Unset => {
                    self.state = TriState::Unset;
                    return self.state;
                }
                TriState::True => {}
            }
        }

        let (mut s, mut r) = (pin(inputs, Self::SET), pin(inputs, Self::RESET));
        if self.params.gate == LatchGate::Nand {
            s = !s;
            r = !r;
        }

        self.state = match (s.as_bool(), r.as_bool()) {
            (Some(true), Some(false)) => TriState::True,
            (Some(false), Some(true)) => TriState::False,
            (Some(false), Some(false)) => self.state,
            (Some(true), Some(true)) if self.params.stabilize => self.state,
            // Unresolved conflict, or an unset S or R.
            _ => TriState::Unset,
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::TriState::{False as F, True as T, Unset as U};

    #[test]
    fn set_reset_hold() {
        let mut latch = SrLatch::new(LatchParams::default());
        assert_eq!(latch.recompute(&[T, F]), T);
        assert_eq!(latch.recompute(&[F, F]), T);
        assert_eq!(latch.recompute(&[F, T]), F);
        assert_eq!(latch.recompute(&[F, F]), F);
    }

    #[test]
    fn conflict_without_stabilize_is_unset() {
        let mut latch = SrLatch::new(LatchParams::default());
        latch.recompute(&[T, F]);
        assert_eq!(latch.recompute(&[T, T]), U);
        // Holding an unset state keeps it unset until set or reset.
        assert_eq!(latch.recompute(&[F, F]), U);
        assert_eq!(latch.recompute(&[F, T]), F);
    }

    #[test]
    fn conflict_with_stabilize_holds() {
        let mut latch = SrLatch::new(LatchParams {
            stabilize: true,
            ..LatchParams::default()
        });
        latch.recompute(&[T, F]);
        assert_eq!(latch.recompute(&[T, T]), T);
        latch.recompute(&[F, T]);
        assert_eq!(latch.recompute(&[T, T]), F);
    }

    #[test]
    fn sync_latch_only_reacts_while_enabled() {
        let mut latch = SrLatch::new(LatchParams {
            sync: true,
            ..LatchParams::default()
        });
        assert_eq!(latch.recompute(&[T, F, F]), F);
        assert_eq!(latch.recompute(&[T, F, T]), T);
        assert_eq!(latch.recompute(&[F, T, F]), T);
        assert_eq!(latch.recompute(&[F, T, U]), U);
    }

    #[test]
    fn nand_latch_has_active_low_inputs() {
        let mut latch = SrLatch::new(LatchParams {
            gate: LatchGate::Nand,
            ..LatchParams::default()
        });
        // S̄ low sets.
        assert_eq!(latch.recompute(&[F, T]), T);
        // Both high holds.
        assert_eq!(latch.recompute(&[T, T]), T);
        // R̄ low resets.
        assert_eq!(latch.recompute(&[T, F]), F);
        assert_eq!(latch.recompute(&[F, F]), U);
    }

    #[test]
    fn unset_input_makes_state_unset() {
        let mut latch = SrLatch::new(LatchParams::default());
        assert_eq!(latch.recompute(&[U, F]), U);
    }
}
