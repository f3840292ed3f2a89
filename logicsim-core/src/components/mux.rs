//! Multiplexer
//!
//! A `from`-to-`to` multiplexer routes one group of `to` data inputs to its
//! `to` outputs. The inputs are split into `num_groups = ceil(from / to)`
//! groups, selected by `num_sel = ceil(log2(num_groups))` selector lines.
//!
//! # Pin layout
//!
//! - inputs `0 .. num_groups * to`: data, group-major (group `g`, bit `i` at
//!   `g * to + i`)
//! - inputs `num_groups * to ..`: selectors, least significant bit first
//! - outputs `0 .. to`
//!
//! When `from` is not a multiple of `to`, the last group is padded with
//! extra pins, so there are always `num_groups * to` data inputs.
//!
//! # Undecodable selectors
//!
//! If any selector bit is unset, or the decoded index does not name a group
//! (possible when `num_groups` is not a power of two), every output is
//! unset. A partially known index is never used.

use serde::{Deserialize, Serialize};

use super::{pin, ComponentKind, Outputs};
use crate::error::{Result, SimulationError};
use crate::logic::TriState;

/// Parameters of a multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuxParams {
    /// Number of data inputs.
    pub from: u32,
    /// Number of outputs.
    pub to: u32,
}

/// A multiplexer instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mux {
    params: MuxParams,
    num_groups: usize,
    num_sel: usize,
}

impl Mux {
    pub fn new(params: MuxParams) -> Result<Self> {
        let MuxParams { from, to } = params;
        if to == 0 {
            return Err(invalid("a multiplexer needs at least one output".into()));
        }
        if to > from {
            return Err(invalid(format!("cannot route {from} inputs to {to} outputs")));
        }

        let num_groups = from.div_ceil(to) as usize;
        Ok(Self {
            params,
            num_groups,
            num_sel: selector_width(num_groups),
        })
    }

    pub fn params(&self) -> MuxParams {
        self.params
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    pub fn num_sel(&self) -> usize {
        self.num_sel
    }

    fn group_width(&self) -> usize {
        self.params.to as usize
    }

    pub fn num_data_inputs(&self) -> usize {
        self.num_groups * self.group_width()
    }

    pub fn num_inputs(&self) -> usize {
        self.num_data_inputs() + self.num_sel
    }

    pub fn num_outputs(&self) -> usize {
        self.group_width()
    }

    /// Index of data input `bit` of group `group`.
    pub fn data_pin(&self, group: usize, bit: usize) -> usize {
        group * self.group_width() + bit
    }

    /// Index of selector line `bit` (0 is the least significant).
    pub fn selector_pin(&self, bit: usize) -> usize {
        self.num_data_inputs() + bit
    }

    /// Decode the selector lines into a group index.
    ///
    /// Returns `None` if any line is unset or the index is out of range.
    pub fn selected_group(&self, inputs: &[TriState]) -> Option<usize> {
        let mut index = 0usize;
        for bit in 0..self.num_sel {
            if pin(inputs, self.selector_pin(bit)).as_bool()? {
                index |= 1 << bit;
            }
        }
        (index < self.num_groups).then_some(index)
    }

    pub fn recompute(&self, inputs: &[TriState]) -> Outputs {
        match self.selected_group(inputs) {
            Some(group) => (0..self.group_width())
                .map(|bit| pin(inputs, self.data_pin(group, bit)))
                .collect(),
            None => smallvec::smallvec![TriState::Unset; self.group_width()],
        }
    }
}

/// `ceil(log2(num_groups))`, zero for a single group.
fn selector_width(num_groups: usize) -> usize {
    if num_groups <= 1 {
        0
    } else {
        (usize::BITS - (num_groups - 1).leading_zeros()) as usize
    }
}

fn invalid(reason: String) -> SimulationError {
    SimulationError::InvalidParameters {
        component: ComponentKind::Mux,
        reason,
    }
}
