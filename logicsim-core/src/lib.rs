//! Logicsim Core
//!
//! This crate provides the value-propagation engine for the logicsim digital
//! logic simulator. It implements:
//!
//! - Three-valued logic (true, false, unset)
//! - Gates, logic inputs and outputs, clocks, SR latches, flip-flops and
//!   multiplexers
//! - A netlist of components, pins and wires with dirty tracking
//! - A tick-driven scheduler that propagates values in topological order and
//!   caps oscillating loops
//! - Circuit descriptions exchanged as JSON or MessagePack
//!
//! The engine has no rendering, input handling or file dialogs; an editor
//! drives it through [`Circuit`].
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `logic`: the tri-state value and its operators
//! - `components`: component variants and their recomputation rules
//! - `graph`: the netlist (nodes, wires, dirty set) and the update scheduler
//! - `circuit`: the public facade and circuit descriptions
//! - `config` / `error`: engine configuration and the error type
//!
//! # Example
//!
//! ```rust,ignore
//! use logicsim_core::{Circuit, ComponentSpec, GateType, TriState};
//!
//! let mut circuit = Circuit::new();
//! let a = circuit.create_component(ComponentSpec::logic_input(TriState::True))?;
//! let b = circuit.create_component(ComponentSpec::logic_input(TriState::False))?;
//! let xor = circuit.create_component(ComponentSpec::gate(GateType::Xor))?;
//! circuit.connect_pins(a, 0, xor, 0)?;
//! circuit.connect_pins(b, 0, xor, 1)?;
//!
//! circuit.tick()?;
//! let out = circuit.output_pin(xor, 0)?;
//! assert_eq!(circuit.value_of(out)?, TriState::True);
//! ```

pub mod circuit;
pub mod components;
pub mod config;
pub mod error;
pub mod graph;
pub mod logic;

pub use circuit::{Circuit, CircuitDescription, PinRef, WireDescription};
pub use components::{
    Component, ComponentId, ComponentKind, ComponentSpec, Edge, FlipFlopKind, GateType, LatchGate,
    LatchParams,
};
pub use config::SimulationConfig;
pub use error::{Reference, Result, SimulationError};
pub use graph::{NodeId, NodeRole, TickReport, WireId};
pub use logic::TriState;
