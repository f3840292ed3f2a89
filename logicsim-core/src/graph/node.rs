//! Graph Nodes
//!
//! This module defines the terminals (input and output pins) that live in
//! the netlist.

use std::fmt;

use smallvec::SmallVec;

use super::wire::WireId;
use crate::components::ComponentId;
use crate::logic::TriState;

/// Unique identifier for a node in the netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Whether a node reads from a wire or drives wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Fed by at most one wire. Its value is derived from that wire.
    Input,

    /// Written by its owning component. May fan out to any number of wires.
    Output,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeRole::Input => "input",
            NodeRole::Output => "output",
        })
    }
}

/// A terminal of a component.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier for this node.
    id: NodeId,

    /// The component this node belongs to.
    owner: ComponentId,

    role: NodeRole,

    /// Position among the owner's inputs or outputs.
    pin: usize,

    /// The value last resolved (inputs) or computed (outputs).
    value: TriState,

    /// Overrides `value` when set.
    forced: Option<TriState>,

    /// Wires attached to this node: at most one for an input, the fan-out
    /// for an output.
    wires: SmallVec<[WireId; 2]>,
}

impl Node {
    /// Create a node. Inputs start unset; outputs start at `initial`.
    pub fn new(id: NodeId, owner: ComponentId, role: NodeRole, pin: usize, initial: TriState) -> Self {
        Self {
            id,
            owner,
            role,
            pin,
            value: initial,
            forced: None,
            wires: SmallVec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn owner(&self) -> ComponentId {
        self.owner
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn pin(&self) -> usize {
        self.pin
    }

    /// The value seen by readers: the forced value if any, else the
    /// propagated one.
    pub fn value(&self) -> TriState {
        self.forced.unwrap_or(self.value)
    }

    /// The propagated value, ignoring any forced override.
    pub fn raw_value(&self) -> TriState {
        self.value
    }

    /// Store a propagated value. Returns whether the effective value changed.
    pub fn set_value(&mut self, value: TriState) -> bool {
        let before = self.value();
        self.value = value;
        before != self.value()
    }

    pub fn forced(&self) -> Option<TriState> {
        self.forced
    }

    /// Set or clear the override. Returns whether the effective value changed.
    pub fn set_forced(&mut self, forced: Option<TriState>) -> bool {
        let before = self.value();
        self.forced = forced;
        before != self.value()
    }

    /// The wire feeding this input, if any.
    pub fn feeding_wire(&self) -> Option<WireId> {
        match self.role {
            NodeRole::Input => self.wires.first().copied(),
            NodeRole::Output => None,
        }
    }

    /// Every wire attached to this node.
    pub fn wires(&self) -> &[WireId] {
        &self.wires
    }

    pub fn attach(&mut self, wire: WireId) {
        self.wires.push(wire);
    }

    pub fn detach(&mut self, wire: WireId) {
        self.wires.retain(|w| *w != wire);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> Node {
        Node::new(NodeId::from(0), ComponentId::from(0), NodeRole::Input, 0, TriState::Unset)
    }

    #[test]
    fn forced_value_overrides_propagated() {
        let mut node = input();
        assert!(node.set_value(TriState::True));
        assert!(node.set_forced(Some(TriState::False)));
        assert_eq!(node.value(), TriState::False);
        assert_eq!(node.raw_value(), TriState::True);

        // Propagation underneath a forced value is invisible.
        assert!(!node.set_value(TriState::Unset));
        assert!(node.set_forced(None));
        assert_eq!(node.value(), TriState::Unset);
    }

    #[test]
    fn wire_attachment() {
        let mut node = input();
        assert_eq!(node.feeding_wire(), None);

        node.attach(WireId::from(4));
        assert_eq!(node.feeding_wire(), Some(WireId::from(4)));

        node.detach(WireId::from(4));
        assert!(node.wires().is_empty());
    }

    #[test]
    fn outputs_have_no_feeding_wire() {
        let mut node = Node::new(NodeId::from(1), ComponentId::from(0), NodeRole::Output, 0, TriState::False);
        node.attach(WireId::from(1));
        node.attach(WireId::from(2));
        assert_eq!(node.feeding_wire(), None);
        assert_eq!(node.wires().len(), 2);
    }
}
