//! Wires
//!
//! A wire mirrors the value of one output node onto one input node. It may
//! carry a forced value, which replaces whatever the source drives.

use std::fmt;

use super::node::NodeId;
use crate::logic::TriState;

/// Unique identifier for a wire in the netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(u64);

impl WireId {
    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for WireId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// A directed connection from an output node to an input node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    id: WireId,
    source: NodeId,
    destination: NodeId,
    forced: Option<TriState>,
}

impl Wire {
    pub fn new(id: WireId, source: NodeId, destination: NodeId) -> Self {
        Self {
            id,
            source,
            destination,
            forced: None,
        }
    }

    pub fn id(&self) -> WireId {
        self.id
    }

    /// The output node driving this wire.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// The input node this wire feeds.
    pub fn destination(&self) -> NodeId {
        self.destination
    }

    pub fn forced(&self) -> Option<TriState> {
        self.forced
    }

    /// Set or clear the override. Returns whether it changed.
    pub fn set_forced(&mut self, forced: Option<TriState>) -> bool {
        std::mem::replace(&mut self.forced, forced) != forced
    }

    /// The value delivered to the destination, given the source's value.
    pub fn carry(&self, source_value: TriState) -> TriState {
        self.forced.unwrap_or(source_value)
    }
}
