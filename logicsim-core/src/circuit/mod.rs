//! Circuit
//!
//! The circuit is the single entry point for the editor and renderer. It
//! owns the netlist and the scheduler and exposes every mutation the
//! outside world may perform between ticks.
//!
//! # How It Works
//!
//! 1. The editor creates components from a [`ComponentSpec`] and wires their
//!    pins together.
//!
//! 2. Every mutation marks the affected components dirty:
//!    a. a new or removed wire dirties the component it feeds
//!    b. setting or toggling a logic input dirties the input itself
//!    c. forcing a value dirties whoever reads it
//!
//! 3. Once per frame the driver calls [`Circuit::tick`], which recomputes
//!    dirty components until the circuit settles.
//!
//! 4. The renderer reads values with [`Circuit::value_of`]. Reads never
//!    trigger recomputation.
//!
//! # Reentrancy
//!
//! Every mutating method takes `&mut self`, so no mutation can happen while
//! a tick is running.

mod description;

use crate::components::{Component, ComponentId, ComponentKind, ComponentSpec};
use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::graph::{Netlist, NodeId, NodeRole, TickReport, UpdateScheduler, Wire, WireId};
use crate::logic::TriState;

pub use description::{CircuitDescription, PinRef, WireDescription};

/// A simulated circuit.
#[derive(Debug, Default)]
pub struct Circuit {
    netlist: Netlist,
    scheduler: UpdateScheduler,
}

impl Circuit {
    /// Create an empty circuit with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty circuit with the given configuration.
    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            netlist: Netlist::new(),
            scheduler: UpdateScheduler::new(config),
        }
    }

    /// The configuration applied to each tick.
    pub fn config(&self) -> &SimulationConfig {
        self.scheduler.config()
    }

    /// Replace the configuration. Takes effect on the next tick.
    pub fn set_config(&mut self, config: SimulationConfig) {
        self.scheduler.set_config(config);
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Create a component. It is computed on the next tick.
    pub fn create_component(&mut self, spec: ComponentSpec) -> Result<ComponentId> {
        let component = Component::from_spec(&spec)?;
        let id = self.netlist.add_component(component);
        tracing::debug!(component = %id, kind = %spec.kind(), "created component");
        Ok(id)
    }

    /// Destroy a component, severing its wires first.
    ///
    /// Inputs that were fed by the component go unset immediately.
    pub fn destroy_component(&mut self, id: ComponentId) -> Result<()> {
        let (slot, severed) = self.netlist.remove_component(id)?;
        tracing::debug!(
            component = %id,
            kind = %slot.component().kind(),
            severed = severed.len(),
            "destroyed component"
        );
        Ok(())
    }

    /// Connect an output node to an input node.
    pub fn connect(&mut self, output: NodeId, input: NodeId) -> Result<WireId> {
        let wire = self.netlist.add_wire(output, input)?;
        tracing::debug!(wire = %wire, from = %output, to = %input, "connected");
        Ok(wire)
    }

    /// Connect output pin `out_pin` of `from` to input pin `in_pin` of `to`.
    pub fn connect_pins(
        &mut self,
        from: ComponentId,
        out_pin: usize,
        to: ComponentId,
        in_pin: usize,
    ) -> Result<WireId> {
        let output = self.output_pin(from, out_pin)?;
        let input = self.input_pin(to, in_pin)?;
        self.connect(output, input)
    }

    /// Remove a wire. Its destination goes unset immediately.
    pub fn disconnect(&mut self, wire: WireId) -> Result<()> {
        let removed = self.netlist.remove_wire(wire)?;
        tracing::debug!(
            wire = %wire,
            from = %removed.source(),
            to = %removed.destination(),
            "disconnected"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    /// Force a node to a value, or clear the override with `None`.
    ///
    /// A forced input is read by its owner instead of the wired value; a
    /// forced output is seen by every wire it drives.
    pub fn set_forced_value(&mut self, node: NodeId, forced: Option<TriState>) -> Result<()> {
        let target = self.netlist.node_mut(node)?;
        let changed = target.set_forced(forced);
        let (role, owner) = (target.role(), target.owner());

        match role {
            NodeRole::Input => self.netlist.mark_dirty(owner),
            NodeRole::Output if changed => self.netlist.mark_fanout_dirty(node),
            NodeRole::Output => {}
        }
        tracing::debug!(node = %node, forced = ?forced, "forced node value");
        Ok(())
    }

    /// Force the value a wire carries, or clear the override with `None`.
    pub fn set_wire_forced_value(&mut self, wire: WireId, forced: Option<TriState>) -> Result<()> {
        let target = self.netlist.wire_mut(wire)?;
        let changed = target.set_forced(forced);
        let destination = target.destination();

        if changed {
            let owner = self.netlist.node(destination)?.owner();
            self.netlist.mark_dirty(owner);
        }
        tracing::debug!(wire = %wire, forced = ?forced, "forced wire value");
        Ok(())
    }

    /// Set the value of a logic input.
    pub fn set_input_value(&mut self, id: ComponentId, value: TriState) -> Result<()> {
        let changed = match self.netlist.slot_mut(id)?.component_mut() {
            Component::LogicInput(input) => input.set(value),
            other => return Err(wrong_kind(id, ComponentKind::LogicInput, other.kind())),
        };
        if changed {
            self.netlist.mark_dirty(id);
        }
        Ok(())
    }

    /// Toggle a logic input and return its new value.
    pub fn toggle_input(&mut self, id: ComponentId) -> Result<TriState> {
        let value = match self.netlist.slot_mut(id)?.component_mut() {
            Component::LogicInput(input) => input.toggle(),
            other => return Err(wrong_kind(id, ComponentKind::LogicInput, other.kind())),
        };
        self.netlist.mark_dirty(id);
        tracing::debug!(component = %id, value = %value, "toggled input");
        Ok(value)
    }

    /// Swap an implication gate with its mirrored variant. Returns whether
    /// the gate type changed.
    pub fn swap_gate_variant(&mut self, id: ComponentId) -> Result<bool> {
        let swapped = match self.netlist.slot_mut(id)?.component_mut() {
            Component::Gate(gate) => gate.swap_variant(),
            other => return Err(wrong_kind(id, ComponentKind::Gate, other.kind())),
        };
        if swapped {
            self.netlist.mark_dirty(id);
        }
        Ok(swapped)
    }

    /// Read the current value of a node. Never triggers recomputation.
    pub fn value_of(&self, node: NodeId) -> Result<TriState> {
        Ok(self.netlist.node(node)?.value())
    }

    /// The value shown by a logic output: whatever reaches its pin.
    pub fn output_value(&self, id: ComponentId) -> Result<TriState> {
        match self.component(id)? {
            Component::LogicOutput(_) => self.value_of(self.input_pin(id, 0)?),
            other => Err(wrong_kind(id, ComponentKind::LogicOutput, other.kind())),
        }
    }

    // ------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> Result<TickReport> {
        self.scheduler.tick(&mut self.netlist)
    }

    /// Tick until a tick ends with nothing pending, at most `max_ticks` times.
    ///
    /// Returns the number of ticks run. If every tick hit the pass cap, the
    /// last oscillation error is returned.
    pub fn settle(&mut self, max_ticks: u64) -> Result<u64> {
        let mut last = None;
        for ran in 1..=max_ticks {
            match self.tick() {
                Ok(_) => return Ok(ran),
                Err(err @ SimulationError::OscillationLimitExceeded { .. }) => last = Some(err),
                Err(err) => return Err(err),
            }
        }
        match last {
            Some(err) => Err(err),
            None => Ok(0),
        }
    }

    /// Run `ticks` ticks, stopping at the first error.
    ///
    /// Returns the report of the last tick, or `None` when `ticks` is zero.
    pub fn run(&mut self, ticks: u64) -> Result<Option<TickReport>> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.tick()?);
        }
        Ok(last)
    }

    pub fn tick_count(&self) -> u64 {
        self.scheduler.tick_count()
    }

    /// Whether no component is waiting to be recomputed.
    pub fn is_stable(&self) -> bool {
        !self.netlist.has_dirty()
    }

    pub fn is_dirty(&self, id: ComponentId) -> Result<bool> {
        self.netlist.slot(id)?;
        Ok(self.netlist.is_dirty(id))
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn component(&self, id: ComponentId) -> Result<&Component> {
        Ok(self.netlist.slot(id)?.component())
    }

    /// Every component id, in creation order.
    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.netlist.slots().map(|slot| slot.id())
    }

    pub fn component_count(&self) -> usize {
        self.netlist.component_count()
    }

    pub fn inputs(&self, id: ComponentId) -> Result<&[NodeId]> {
        Ok(self.netlist.slot(id)?.inputs())
    }

    pub fn outputs(&self, id: ComponentId) -> Result<&[NodeId]> {
        Ok(self.netlist.slot(id)?.outputs())
    }

    pub fn input_pin(&self, id: ComponentId, pin: usize) -> Result<NodeId> {
        self.inputs(id)?
            .get(pin)
            .copied()
            .ok_or(SimulationError::NoSuchPin {
                component: id,
                role: NodeRole::Input,
                pin,
            })
    }

    pub fn output_pin(&self, id: ComponentId, pin: usize) -> Result<NodeId> {
        self.outputs(id)?
            .get(pin)
            .copied()
            .ok_or(SimulationError::NoSuchPin {
                component: id,
                role: NodeRole::Output,
                pin,
            })
    }

    pub fn wire(&self, id: WireId) -> Result<&Wire> {
        self.netlist.wire(id)
    }

    pub fn wire_count(&self) -> usize {
        self.netlist.wire_count()
    }
}

fn wrong_kind(id: ComponentId, expected: ComponentKind, actual: ComponentKind) -> SimulationError {
    SimulationError::WrongComponentKind { id, expected, actual }
}
