//! Netlist storage.
//!
//! The netlist owns every component, node and wire in a circuit, each in an
//! insertion-ordered arena keyed by id. Back-references (node to owner,
//! input node to feeding wire, output node to fan-out) are ids into these
//! arenas, never pointers.

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;

use super::node::{Node, NodeId, NodeRole};
use super::wire::{Wire, WireId};
use crate::components::{Component, ComponentId, Outputs, Step};
use crate::error::{Reference, Result, SimulationError};
use crate::logic::TriState;

/// Pin lists of a component.
pub type Pins = SmallVec<[NodeId; 4]>;

/// A component together with the nodes it owns.
#[derive(Debug, Clone)]
pub struct ComponentSlot {
    id: ComponentId,
    component: Component,
    inputs: Pins,
    outputs: Pins,
}

impl ComponentSlot {
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut Component {
        &mut self.component
    }

    /// Input nodes, in pin order.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Output nodes, in pin order.
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }
}

/// Arena of components, nodes and wires, plus the dirty set.
#[derive(Debug, Default)]
pub struct Netlist {
    components: IndexMap<ComponentId, ComponentSlot>,
    nodes: IndexMap<NodeId, Node>,
    wires: IndexMap<WireId, Wire>,

    /// Components whose outputs may be stale, in the order they were marked.
    dirty: IndexSet<ComponentId>,

    next_component: u64,
    next_node: u64,
    next_wire: u64,
}

impl Netlist {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------

    /// Add a component and create its nodes. The component starts dirty.
    pub fn add_component(&mut self, component: Component) -> ComponentId {
        let id = ComponentId::from(self.next_component);
        self.next_component += 1;

        let inputs: Pins = (0..component.num_inputs())
            .map(|pin| self.add_node(id, NodeRole::Input, pin, TriState::Unset))
            .collect();
        let outputs: Pins = component
            .initial_outputs()
            .into_iter()
            .enumerate()
            .map(|(pin, value)| self.add_node(id, NodeRole::Output, pin, value))
            .collect();

        self.components.insert(
            id,
            ComponentSlot {
                id,
                component,
                inputs,
                outputs,
            },
        );
        self.dirty.insert(id);
        id
    }

    fn add_node(&mut self, owner: ComponentId, role: NodeRole, pin: usize, initial: TriState) -> NodeId {
        let id = NodeId::from(self.next_node);
        self.next_node += 1;
        self.nodes.insert(id, Node::new(id, owner, role, pin, initial));
        id
    }

    /// Remove a component, severing every wire attached to its nodes first.
    ///
    /// Returns the removed slot and the wires that were severed.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<(ComponentSlot, Vec<Wire>)> {
        let slot = self
            .components
            .get(&id)
            .ok_or(SimulationError::DanglingReference(Reference::Component(id)))?;

        // A wire looping back into the same component is attached twice.
        let attached: IndexSet<WireId> = slot
            .inputs
            .iter()
            .chain(slot.outputs.iter())
            .filter_map(|node| self.nodes.get(node))
            .flat_map(|node| node.wires().iter().copied())
            .collect();

        let mut severed = Vec::with_capacity(attached.len());
        for wire in attached {
            severed.push(self.remove_wire(wire)?);
        }

        let slot = self
            .components
            .shift_remove(&id)
            .ok_or(SimulationError::DanglingReference(Reference::Component(id)))?;
        for node in slot.inputs.iter().chain(slot.outputs.iter()) {
            self.nodes.shift_remove(node);
        }
        self.dirty.shift_remove(&id);

        Ok((slot, severed))
    }

    pub fn slot(&self, id: ComponentId) -> Result<&ComponentSlot> {
        self.components
            .get(&id)
            .ok_or(SimulationError::DanglingReference(Reference::Component(id)))
    }

    pub fn slot_mut(&mut self, id: ComponentId) -> Result<&mut ComponentSlot> {
        self.components
            .get_mut(&id)
            .ok_or(SimulationError::DanglingReference(Reference::Component(id)))
    }

    /// Every component, in creation order.
    pub fn slots(&self) -> impl Iterator<Item = &ComponentSlot> {
        self.components.values()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    // ------------------------------------------------------------------
    // Nodes and wires
    // ------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(&id)
            .ok_or(SimulationError::DanglingReference(Reference::Node(id)))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or(SimulationError::DanglingReference(Reference::Node(id)))
    }

    pub fn wire(&self, id: WireId) -> Result<&Wire> {
        self.wires
            .get(&id)
            .ok_or(SimulationError::DanglingReference(Reference::Wire(id)))
    }

    pub fn wire_mut(&mut self, id: WireId) -> Result<&mut Wire> {
        self.wires
            .get_mut(&id)
            .ok_or(SimulationError::DanglingReference(Reference::Wire(id)))
    }

    /// Every wire, in creation order.
    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Connect an output node to an input node and dirty the input's owner.
    pub fn add_wire(&mut self, source: NodeId, destination: NodeId) -> Result<WireId> {
        let src = self.node(source)?;
        if src.role() != NodeRole::Output {
            return Err(SimulationError::InvalidConnection {
                node: source,
                expected: NodeRole::Output,
            });
        }

        let dst = self.node(destination)?;
        if dst.role() != NodeRole::Input {
            return Err(SimulationError::InvalidConnection {
                node: destination,
                expected: NodeRole::Input,
            });
        }
        if let Some(existing) = dst.feeding_wire() {
            return Err(SimulationError::ConnectionConflict {
                input: destination,
                existing,
            });
        }
        let owner = dst.owner();

        let id = WireId::from(self.next_wire);
        self.next_wire += 1;
        self.wires.insert(id, Wire::new(id, source, destination));
        self.node_mut(source)?.attach(id);
        self.node_mut(destination)?.attach(id);
        self.dirty.insert(owner);
        Ok(id)
    }

    /// Remove a wire. The destination input goes unset immediately and its
    /// owner is dirtied.
    pub fn remove_wire(&mut self, id: WireId) -> Result<Wire> {
        let wire = self
            .wires
            .shift_remove(&id)
            .ok_or(SimulationError::DanglingReference(Reference::Wire(id)))?;

        if let Some(source) = self.nodes.get_mut(&wire.source()) {
            source.detach(id);
        }
        if let Some(destination) = self.nodes.get_mut(&wire.destination()) {
            destination.detach(id);
            destination.set_value(TriState::Unset);
            let owner = destination.owner();
            self.dirty.insert(owner);
        }
        Ok(wire)
    }

    /// Components fed by any output of `id`, without duplicates.
    pub fn dependents(&self, id: ComponentId) -> IndexSet<ComponentId> {
        let Some(slot) = self.components.get(&id) else {
            return IndexSet::new();
        };
        slot.outputs
            .iter()
            .filter_map(|node| self.nodes.get(node))
            .flat_map(|node| node.wires().iter())
            .filter_map(|wire| self.wires.get(wire))
            .filter_map(|wire| self.nodes.get(&wire.destination()))
            .map(|node| node.owner())
            .collect()
    }

    // ------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------

    pub fn mark_dirty(&mut self, id: ComponentId) {
        self.dirty.insert(id);
    }

    pub fn is_dirty(&self, id: ComponentId) -> bool {
        self.dirty.contains(&id)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Snapshot of the dirty set, in marking order.
    pub fn dirty(&self) -> Vec<ComponentId> {
        self.dirty.iter().copied().collect()
    }

    /// Dirty the owners of every input fed by `output`.
    pub fn mark_fanout_dirty(&mut self, output: NodeId) {
        let Some(node) = self.nodes.get(&output) else {
            return;
        };
        for wire in node.wires() {
            if let Some(owner) = self
                .wires
                .get(wire)
                .and_then(|w| self.nodes.get(&w.destination()))
                .map(|n| n.owner())
            {
                self.dirty.insert(owner);
            }
        }
    }

    // ------------------------------------------------------------------
    // Propagation
    // ------------------------------------------------------------------

    /// The value an input node receives: its feeding wire's value, or unset.
    fn incoming_value(&self, input: &Node) -> TriState {
        input
            .feeding_wire()
            .and_then(|id| self.wires.get(&id))
            .and_then(|wire| {
                self.nodes
                    .get(&wire.source())
                    .map(|source| wire.carry(source.value()))
            })
            .unwrap_or(TriState::Unset)
    }

    /// Pull fresh values into the inputs of `id`, recompute it, write its
    /// outputs and dirty the components fed by outputs that changed.
    ///
    /// Returns the number of outputs whose value changed.
    pub fn recompute(&mut self, id: ComponentId, step: Step) -> Result<usize> {
        let outputs = self.evaluate(id, step)?;
        self.commit(id, &outputs)
    }

    /// Pull fresh values into the inputs of `id`, clear its dirty flag and
    /// compute its new outputs without writing them.
    pub fn evaluate(&mut self, id: ComponentId, step: Step) -> Result<Outputs> {
        let inputs = self.slot(id)?.inputs.clone();
        let mut values: SmallVec<[TriState; 8]> = SmallVec::with_capacity(inputs.len());
        for node_id in &inputs {
            let incoming = self.incoming_value(self.node(*node_id)?);
            let node = self.node_mut(*node_id)?;
            node.set_value(incoming);
            values.push(node.value());
        }

        // Clear before outputs are written so a component feeding itself is
        // dirtied again.
        self.dirty.shift_remove(&id);

        Ok(self.slot_mut(id)?.component.recompute(&values, step))
    }

    /// Write computed outputs of `id` and dirty the components fed by outputs
    /// that changed. Returns the number of changed outputs.
    pub fn commit(&mut self, id: ComponentId, values: &[TriState]) -> Result<usize> {
        let outputs = self.slot(id)?.outputs.clone();

        let mut changed = 0;
        for (node_id, value) in outputs.iter().zip(values) {
            if self.node_mut(*node_id)?.set_value(*value) {
                changed += 1;
                self.mark_fanout_dirty(*node_id);
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ComponentSpec, GateType};

    fn add(netlist: &mut Netlist, spec: ComponentSpec) -> ComponentId {
        netlist.add_component(Component::from_spec(&spec).unwrap())
    }

    #[test]
    fn add_and_remove_components() {
        let mut netlist = Netlist::new();
        let a = add(&mut netlist, ComponentSpec::gate(GateType::And));
        let b = add(&mut netlist, ComponentSpec::gate(GateType::Not));

        assert_eq!(netlist.component_count(), 2);
        assert_eq!(netlist.slot(a).unwrap().inputs().len(), 2);
        assert!(netlist.is_dirty(a) && netlist.is_dirty(b));

        let (slot, severed) = netlist.remove_component(a).unwrap();
        assert_eq!(slot.id(), a);
        assert!(severed.is_empty());
        assert!(netlist.slot(a).is_err());
        assert!(netlist.node(slot.inputs()[0]).is_err());
        assert!(!netlist.is_dirty(a));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut netlist = Netlist::new();
        let a = add(&mut netlist, ComponentSpec::logic_output());
        netlist.remove_component(a).unwrap();
        let b = add(&mut netlist, ComponentSpec::logic_output());
        assert_ne!(a, b);
    }

    #[test]
    fn wiring_rules() {
        let mut netlist = Netlist::new();
        let src = add(&mut netlist, ComponentSpec::logic_input(TriState::True));
        let gate = add(&mut netlist, ComponentSpec::gate(GateType::Not));
        let out = netlist.slot(src).unwrap().outputs()[0];
        let input = netlist.slot(gate).unwrap().inputs()[0];
        let gate_out = netlist.slot(gate).unwrap().outputs()[0];

        let wire = netlist.add_wire(out, input).unwrap();
        assert_eq!(netlist.node(input).unwrap().feeding_wire(), Some(wire));

        assert!(matches!(
            netlist.add_wire(gate_out, input),
            Err(SimulationError::ConnectionConflict { existing, .. }) if existing == wire
        ));
        assert!(matches!(
            netlist.add_wire(input, input),
            Err(SimulationError::InvalidConnection { expected: NodeRole::Output, .. })
        ));
        assert!(matches!(
            netlist.add_wire(out, gate_out),
            Err(SimulationError::InvalidConnection { expected: NodeRole::Input, .. })
        ));
        assert_eq!(netlist.wire_count(), 1);
        assert_eq!(netlist.dependents(src).into_iter().collect::<Vec<_>>(), vec![gate]);
    }

    #[test]
    fn removing_a_component_severs_wires() {
        let mut netlist = Netlist::new();
        let src = add(&mut netlist, ComponentSpec::logic_input(TriState::True));
        let gate = add(&mut netlist, ComponentSpec::gate(GateType::Not));
        let out = netlist.slot(src).unwrap().outputs()[0];
        let input = netlist.slot(gate).unwrap().inputs()[0];
        netlist.add_wire(out, input).unwrap();

        let step = Step { tick: 1 };
        netlist.recompute(src, step).unwrap();
        netlist.recompute(gate, step).unwrap();
        assert_eq!(netlist.node(input).unwrap().value(), TriState::True);
        assert!(!netlist.has_dirty());

        let (_, severed) = netlist.remove_component(src).unwrap();
        assert_eq!(severed.len(), 1);
        assert_eq!(netlist.node(input).unwrap().value(), TriState::Unset);
        assert!(netlist.is_dirty(gate));
        assert_eq!(netlist.wire_count(), 0);
    }

    #[test]
    fn removing_a_self_looped_component() {
        let mut netlist = Netlist::new();
        let not = add(&mut netlist, ComponentSpec::gate(GateType::Not));
        let out = netlist.slot(not).unwrap().outputs()[0];
        let input = netlist.slot(not).unwrap().inputs()[0];
        netlist.add_wire(out, input).unwrap();

        let (_, severed) = netlist.remove_component(not).unwrap();
        assert_eq!(severed.len(), 1);
        assert_eq!(netlist.wire_count(), 0);
    }

    #[test]
    fn recompute_dirties_fanout_only_on_change() {
        let mut netlist = Netlist::new();
        let src = add(&mut netlist, ComponentSpec::logic_input(TriState::False));
        let gate = add(&mut netlist, ComponentSpec::gate(GateType::Not));
        let out = netlist.slot(src).unwrap().outputs()[0];
        let input = netlist.slot(gate).unwrap().inputs()[0];
        netlist.add_wire(out, input).unwrap();

        let step = Step { tick: 1 };
        netlist.recompute(gate, step).unwrap();
        // The logic input already drives its initial value.
        assert_eq!(netlist.recompute(src, step).unwrap(), 0);
        assert!(!netlist.is_dirty(gate));
    }
}
