//! Netlist Graph
//!
//! This module implements the graph that connects components: their pins
//! (nodes), the wires between pins, and the scheduler that propagates values
//! along those wires.
//!
//! # Overview
//!
//! The netlist is a directed graph where:
//!
//! - Each component owns a fixed list of input nodes and output nodes
//! - A wire runs from exactly one output node to exactly one input node
//! - An input node has at most one feeding wire; an output node may fan out
//!
//! Unlike a pure dependency DAG, the netlist may contain cycles: a latch
//! built from two cross-coupled gates, or a flip-flop whose Q̄ feeds its own
//! D input. The scheduler handles both.
//!
//! # Design Decisions
//!
//! 1. One netlist owns all components, nodes and wires, each in an arena
//!    keyed by an opaque id. Back-references are ids, so there is no shared
//!    ownership between components and wires.
//!
//! 2. Ids are allocated per netlist and never reused. Together with
//!    insertion-ordered arenas, this makes every run deterministic.
//!
//! 3. Dirty tracking is a set of component ids. A component is dirtied when
//!    an input it reads may have changed, and cleaned when it recomputes.

mod netlist;
mod node;
mod scheduler;
mod wire;

pub use netlist::{ComponentSlot, Netlist, Pins};
pub use node::{Node, NodeId, NodeRole};
pub use scheduler::{TickReport, UpdateScheduler};
pub use wire::{Wire, WireId};
