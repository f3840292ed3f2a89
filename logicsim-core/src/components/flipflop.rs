//! Flip-flops
//!
//! Edge-triggered storage with outputs `[Q, Q̄]`. Each flip-flop remembers
//! the last level it saw on its clock pin; a triggering edge is a defined
//! transition from that level (`False→True` for rising, `True→False` for
//! falling). An unset clock never forms an edge.
//!
//! Input pins, in order:
//!
//! - D, master-slave D, T: `[data, CLK]`
//! - JK: `[J, K, CLK]`
//!
//! The master-slave D flip-flop captures D into its master stage on the
//! triggering edge and copies the master to Q on the opposite edge, so Q
//! changes half a clock cycle after the sample.

use serde::{Deserialize, Serialize};

use super::pin;
use crate::logic::TriState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipFlopKind {
    D,
    DMasterSlave,
    T,
    Jk,
}

/// Clock transition a flip-flop triggers on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    #[default]
    Rising,
    Falling,
}

impl Edge {
    /// Whether going from `previous` to `current` is this edge.
    pub fn matches(self, previous: TriState, current: TriState) -> bool {
        match self {
            Edge::Rising => previous == TriState::False && current == TriState::True,
            Edge::Falling => previous == TriState::True && current == TriState::False,
        }
    }

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Rising => Edge::Falling,
            Edge::Falling => Edge::Rising,
        }
    }
}

/// Parameters of a flip-flop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipFlopParams {
    pub kind: FlipFlopKind,
    #[serde(default)]
    pub edge: Edge,
}

/// A flip-flop instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipFlop {
    params: FlipFlopParams,
    q: TriState,
    /// Master stage of the master-slave variant.
    master: TriState,
    last_clock: TriState,
}

impl FlipFlop {
    pub fn new(params: FlipFlopParams) -> Self {
        Self {
            params,
            q: TriState::False,
            master: TriState::False,
            last_clock: TriState::Unset,
        }
    }

    pub fn params(&self) -> FlipFlopParams {
        self.params
    }

    pub fn num_inputs(&self) -> usize {
        match self.params.kind {
            FlipFlopKind::Jk => 3,
            _ => 2,
        }
    }

    /// Index of the clock pin.
    pub fn clock_pin(&self) -> usize {
        self.num_inputs() - 1
    }

    /// The stored Q value.
    pub fn state(&self) -> TriState {
        self.q
    }

    pub fn recompute(&mut self, inputs: &[TriState]) -> TriState {
        let clock = pin(inputs, self.clock_pin());
        let previous = std::mem::replace(&mut self.last_clock, clock);
        let edge = self.params.edge;

        if edge.matches(previous, clock) {
            self.on_edge(inputs);
        } else if self.params.kind == FlipFlopKind::DMasterSlave
            && edge.opposite().matches(previous, clock)
        {
            self.q = self.master;
        }
        self.q
    }

    fn on_edge(&mut self, inputs: &[TriState]) {
        let data = pin(inputs, 0);
        match self.params.kind {
            FlipFlopKind::D => self.q = data,
            FlipFlopKind::DMasterSlave => self.master = data,
            FlipFlopKind::T => {
                self.q = match data {
                    TriState::True => !self.q,
                    TriState::False => self.q,
                    TriState::Unset => TriState::Unset,
                }
            }
            FlipFlopKind::Jk => {
                let (j, k) = (data, pin(inputs, 1));
                self.q = match (j.as_bool(), k.as_bool()) {
                    (Some(true), Some(false)) => TriState::True,
                    (Some(false), Some(true)) => TriState::False,
                    (Some(false), Some(false)) => self.q,
                    (Some(true), Some(true)) => !self.q,
                    _ => TriState::Unset,
                }
            }
        }
    }
}
