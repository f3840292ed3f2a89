//! Errors produced by the simulation engine.
//!
//! Every error is recoverable: a rejected mutation leaves the circuit exactly
//! as it was, and an oscillating tick leaves the circuit in a consistent
//! (if not yet stable) state that the next tick continues from.

use std::fmt;

use crate::components::{ComponentId, ComponentKind};
use crate::graph::{NodeId, NodeRole, WireId};

/// A handle that can outlive the thing it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    Component(ComponentId),
    Node(NodeId),
    Wire(WireId),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Component(id) => write!(f, "component {id}"),
            Reference::Node(id) => write!(f, "node {id}"),
            Reference::Wire(id) => write!(f, "wire {id}"),
        }
    }
}

/// Errors produced by circuit mutation, simulation and exchange.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The input node already has a feeding wire.
    #[error("input {input} is already connected by wire {existing}")]
    ConnectionConflict {
        /// The input node that was targeted.
        input: NodeId,
        /// The wire currently feeding it.
        existing: WireId,
    },

    /// A wire endpoint has the wrong role.
    #[error("node {node} cannot be used here: expected an {expected} node")]
    InvalidConnection {
        /// The offending node.
        node: NodeId,
        /// The role that was required.
        expected: NodeRole,
    },

    /// Component parameters were rejected at construction.
    #[error("invalid {component} parameters: {reason}")]
    InvalidParameters {
        /// The kind of component being built.
        component: ComponentKind,
        /// Why the parameters were rejected.
        reason: String,
    },

    /// Propagation did not settle within the pass cap.
    #[error(
        "tick {tick}: propagation did not stabilize after {passes} passes ({} components still pending)",
        .pending.len()
    )]
    OscillationLimitExceeded {
        /// The tick during which the cap was hit.
        tick: u64,
        /// Number of passes that ran.
        passes: usize,
        /// Components left dirty, carried into the next tick.
        pending: Vec<ComponentId>,
    },

    /// The id refers to something that does not exist (or no longer exists).
    #[error("{0} does not exist")]
    DanglingReference(Reference),

    /// The component has no pin at this index.
    #[error("component {component} has no {role} pin {pin}")]
    NoSuchPin {
        component: ComponentId,
        role: NodeRole,
        pin: usize,
    },

    /// The operation does not apply to this kind of component.
    #[error("component {id} is a {actual}, expected a {expected}")]
    WrongComponentKind {
        id: ComponentId,
        expected: ComponentKind,
        actual: ComponentKind,
    },

    /// A circuit description refers to a component or pin it does not contain.
    #[error("invalid circuit description: {0}")]
    InvalidDescription(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MessagePack encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("MessagePack decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;
