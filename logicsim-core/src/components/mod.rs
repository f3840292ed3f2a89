//! Components
//!
//! A component owns a fixed set of input and output pins and a recomputation
//! function mapping the current input values to new output values.
//!
//! # Variants
//!
//! The set of variants is closed:
//!
//! - [`Gate`]: two-input gates and the inverter
//! - [`LogicInput`] / [`LogicOutput`]: user-driven sources and observed sinks
//! - [`Clock`]: periodic source driven by the tick counter
//! - [`SrLatch`]: level-sensitive set/reset latch, optionally enabled
//! - [`FlipFlop`]: edge-triggered D, master-slave D, T and JK flip-flops
//! - [`Mux`]: grouped multiplexer
//!
//! # Feedback
//!
//! Sequential components (latches and flip-flops) keep their previous output
//! and last clock level as part of their own state. Recomputation reads that
//! state as an extra input instead of walking back through the graph, so a
//! feedback loop through a sequential component never recurses.
//!
//! # Construction
//!
//! Components are built from a [`ComponentSpec`]: the variant tag plus its
//! parameters. The spec is also what a circuit description persists, so
//! [`Component::spec`] must round-trip through [`Component::from_spec`].

mod clock;
mod flipflop;
mod gate;
mod io;
mod latch;
mod mux;

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::Result;
use crate::logic::TriState;

pub use clock::{Clock, ClockParams};
pub use flipflop::{Edge, FlipFlop, FlipFlopKind, FlipFlopParams};
pub use gate::{Gate, GateParams, GateType, ParseGateTypeError};
pub use io::{LogicInput, LogicInputParams, LogicOutput, LogicOutputParams};
pub use latch::{LatchGate, LatchParams, SrLatch};
pub use mux::{Mux, MuxParams};

/// Output values produced by one recomputation, one per output pin.
pub type Outputs = SmallVec<[TriState; 4]>;

/// Unique identifier for a component within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ComponentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// The variant of a component, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Gate,
    LogicInput,
    LogicOutput,
    Clock,
    SrLatch,
    FlipFlop,
    Mux,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Gate => "gate",
            ComponentKind::LogicInput => "logic input",
            ComponentKind::LogicOutput => "logic output",
            ComponentKind::Clock => "clock",
            ComponentKind::SrLatch => "SR latch",
            ComponentKind::FlipFlop => "flip-flop",
            ComponentKind::Mux => "multiplexer",
        };
        f.write_str(name)
    }
}

/// Variant tag plus parameters: everything needed to rebuild a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentSpec {
    Gate(GateParams),
    LogicInput(LogicInputParams),
    LogicOutput(LogicOutputParams),
    Clock(ClockParams),
    SrLatch(LatchParams),
    FlipFlop(FlipFlopParams),
    Mux(MuxParams),
}

impl ComponentSpec {
    pub fn gate(gate_type: GateType) -> Self {
        ComponentSpec::Gate(GateParams { gate_type })
    }

    pub fn logic_input(value: TriState) -> Self {
        ComponentSpec::LogicInput(LogicInputParams { value, name: None })
    }

    pub fn logic_output() -> Self {
        ComponentSpec::LogicOutput(LogicOutputParams::default())
    }

    pub fn clock(period: u32, duty_cycle: u32) -> Self {
        ComponentSpec::Clock(ClockParams { period, duty_cycle })
    }

    pub fn sr_latch(params: LatchParams) -> Self {
        ComponentSpec::SrLatch(params)
    }

    pub fn flip_flop(kind: FlipFlopKind, edge: Edge) -> Self {
        ComponentSpec::FlipFlop(FlipFlopParams { kind, edge })
    }

    pub fn mux(from: u32, to: u32) -> Self {
        ComponentSpec::Mux(MuxParams { from, to })
    }

    /// Get the kind of component this spec builds.
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentSpec::Gate(_) => ComponentKind::Gate,
            ComponentSpec::LogicInput(_) => ComponentKind::LogicInput,
            ComponentSpec::LogicOutput(_) => ComponentKind::LogicOutput,
            ComponentSpec::Clock(_) => ComponentKind::Clock,
            ComponentSpec::SrLatch(_) => ComponentKind::SrLatch,
            ComponentSpec::FlipFlop(_) => ComponentKind::FlipFlop,
            ComponentSpec::Mux(_) => ComponentKind::Mux,
        }
    }
}

/// Per-tick context handed to every recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// The tick currently being simulated (the first tick is 1).
    pub tick: u64,
}

/// A component instance with its variant-specific state.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Gate(Gate),
    LogicInput(LogicInput),
    LogicOutput(LogicOutput),
    Clock(Clock),
    SrLatch(SrLatch),
    FlipFlop(FlipFlop),
    Mux(Mux),
}

impl Component {
    /// Build a component from its spec, validating the parameters.
    pub fn from_spec(spec: &ComponentSpec) -> Result<Self> {
        let component = match spec {
            ComponentSpec::Gate(params) => Component::Gate(Gate::new(params.gate_type)),
            ComponentSpec::LogicInput(params) => Component::LogicInput(LogicInput::new(params.clone())),
            ComponentSpec::LogicOutput(params) => Component::LogicOutput(LogicOutput::new(params.clone())),
            ComponentSpec::Clock(params) => Component::Clock(Clock::new(*params)?),
            ComponentSpec::SrLatch(params) => Component::SrLatch(SrLatch::new(*params)),
            ComponentSpec::FlipFlop(params) => Component::FlipFlop(FlipFlop::new(*params)),
            ComponentSpec::Mux(params) => Component::Mux(Mux::new(*params)?),
        };
        Ok(component)
    }

    /// Get the spec that rebuilds this component (parameters, not runtime state).
    pub fn spec(&self) -> ComponentSpec {
        match self {
            Component::Gate(gate) => ComponentSpec::gate(gate.gate_type()),
            Component::LogicInput(input) => ComponentSpec::LogicInput(input.params()),
            Component::LogicOutput(output) => ComponentSpec::LogicOutput(output.params().clone()),
            Component::Clock(clock) => ComponentSpec::Clock(clock.params()),
            Component::SrLatch(latch) => ComponentSpec::SrLatch(latch.params()),
            Component::FlipFlop(ff) => ComponentSpec::FlipFlop(ff.params()),
            Component::Mux(mux) => ComponentSpec::Mux(mux.params()),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Gate(_) => ComponentKind::Gate,
            Component::LogicInput(_) => ComponentKind::LogicInput,
            Component::LogicOutput(_) => ComponentKind::LogicOutput,
            Component::Clock(_) => ComponentKind::Clock,
            Component::SrLatch(_) => ComponentKind::SrLatch,
            Component::FlipFlop(_) => ComponentKind::FlipFlop,
            Component::Mux(_) => ComponentKind::Mux,
        }
    }

    /// Number of input pins. Fixed for the lifetime of the component.
    pub fn num_inputs(&self) -> usize {
        match self {
            Component::Gate(gate) => gate.gate_type().num_inputs(),
            Component::LogicInput(_) => 0,
            Component::LogicOutput(_) => 1,
            Component::Clock(_) => 0,
            Component::SrLatch(latch) => latch.num_inputs(),
            Component::FlipFlop(ff) => ff.num_inputs(),
            Component::Mux(mux) => mux.num_inputs(),
        }
    }

    /// Number of output pins. Fixed for the lifetime of the component.
    pub fn num_outputs(&self) -> usize {
        match self {
            Component::Gate(_) => 1,
            Component::LogicInput(_) => 1,
            Component::LogicOutput(_) => 0,
            Component::Clock(_) => 1,
            Component::SrLatch(_) => 2,
            Component::FlipFlop(_) => 2,
            Component::Mux(mux) => mux.num_outputs(),
        }
    }

    /// Output values before the first recomputation.
    pub fn initial_outputs(&self) -> Outputs {
        match self {
            Component::LogicInput(input) => smallvec::smallvec![input.value()],
            // Q starts low, so Q̄ starts high.
            Component::SrLatch(_) | Component::FlipFlop(_) => {
                smallvec::smallvec![TriState::False, TriState::True]
            }
            other => smallvec::smallvec![TriState::False; other.num_outputs()],
        }
    }

    /// Whether the component keeps state that feeds back into its outputs.
    pub fn is_sequential(&self) -> bool {
        matches!(self, Component::SrLatch(_) | Component::FlipFlop(_))
    }

    /// Whether the component must be recomputed on every tick.
    pub fn is_clocked_source(&self) -> bool {
        matches!(self, Component::Clock(_))
    }

    /// Compute new output values from the current input values.
    ///
    /// `inputs` holds one value per input pin, in pin order. Sequential
    /// components update their stored state as a side effect.
    pub fn recompute(&mut self, inputs: &[TriState], step: Step) -> Outputs {
        match self {
            Component::Gate(gate) => smallvec::smallvec![gate.recompute(inputs)],
            Component::LogicInput(input) => smallvec::smallvec![input.value()],
            Component::LogicOutput(_) => Outputs::new(),
            Component::Clock(clock) => smallvec::smallvec![clock.recompute(step)],
            Component::SrLatch(latch) => complementary(latch.recompute(inputs)),
            Component::FlipFlop(ff) => complementary(ff.recompute(inputs)),
            Component::Mux(mux) => mux.recompute(inputs),
        }
    }
}

/// `[Q, Q̄]` for a sequential component's stored value.
fn complementary(q: TriState) -> Outputs {
    smallvec::smallvec![q, !q]
}

/// Read an input pin, treating a missing pin as unconnected.
fn pin(inputs: &[TriState], index: usize) -> TriState {
    inputs.get(index).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_counts_follow_variant() {
        let cases = [
            (ComponentSpec::gate(GateType::And), 2, 1),
            (ComponentSpec::gate(GateType::Not), 1, 1),
            (ComponentSpec::logic_input(TriState::False), 0, 1),
            (ComponentSpec::logic_output(), 1, 0),
            (ComponentSpec::clock(4, 50), 0, 1),
            (ComponentSpec::sr_latch(LatchParams::default()), 2, 2),
            (ComponentSpec::sr_latch(LatchParams { sync: true, ..LatchParams::default() }), 3, 2),
            (ComponentSpec::flip_flop(FlipFlopKind::D, Edge::Rising), 2, 2),
            (ComponentSpec::flip_flop(FlipFlopKind::Jk, Edge::Rising), 3, 2),
            (ComponentSpec::mux(8, 4), 9, 4),
        ];

        for (spec, inputs, outputs) in cases {
            let component = Component::from_spec(&spec).unwrap();
            assert_eq!(component.num_inputs(), inputs, "{spec:?}");
            assert_eq!(component.num_outputs(), outputs, "{spec:?}");
            assert_eq!(component.initial_outputs().len(), outputs, "{spec:?}");
            assert_eq!(component.kind(), spec.kind());
        }
    }

    #[test]
    fn spec_round_trips() {
        let specs = [
            ComponentSpec::gate(GateType::Rnimply),
            ComponentSpec::logic_input(TriState::True),
            ComponentSpec::clock(10, 30),
            ComponentSpec::flip_flop(FlipFlopKind::T, Edge::Falling),
            ComponentSpec::mux(6, 2),
        ];

        for spec in specs {
            let component = Component::from_spec(&spec).unwrap();
            assert_eq!(component.spec(), spec);
        }
    }

    #[test]
    fn spec_json_is_tagged() {
        let json = serde_json::to_value(ComponentSpec::mux(8, 4)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "mux", "from": 8, "to": 4 }));

        let spec: ComponentSpec =
            serde_json::from_str(r#"{ "type": "gate", "gate_type": "NIMPLY" }"#).unwrap();
        assert_eq!(spec, ComponentSpec::gate(GateType::Nimply));
    }

    #[test]
    fn sequential_outputs_are_complementary() {
        let mut ff = Component::from_spec(&ComponentSpec::flip_flop(FlipFlopKind::D, Edge::Rising)).unwrap();
        let step = Step { tick: 1 };
        ff.recompute(&[TriState::True, TriState::False], step);
        let outputs = ff.recompute(&[TriState::True, TriState::True], step);
        assert_eq!(outputs.as_slice(), &[TriState::True, TriState::False]);
    }
}
