//! Circuit Description
//!
//! A serializable snapshot of a circuit's structure: the component specs in
//! creation order and the wires between their pins. Components are referred
//! to by position in the list, not by id, so a description loads into any
//! circuit regardless of the ids it already handed out.
//!
//! Runtime state (node values, latch state, tick counter) is not part of a
//! description. Forced wire values are, since they are set up by the editor.
//!
//! # Example
//!
//! ```json
//! {
//!   "components": [
//!     { "type": "logic_input", "value": "true" },
//!     { "type": "gate", "gate_type": "NOT" },
//!     { "type": "logic_output" }
//!   ],
//!   "wires": [
//!     { "from": { "component": 0, "pin": 0 }, "to": { "component": 1, "pin": 0 } },
//!     { "from": { "component": 1, "pin": 0 }, "to": { "component": 2, "pin": 0 } }
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Circuit;
use crate::components::{ComponentId, ComponentSpec};
use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::logic::TriState;

/// A pin of the component at position `component` in the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRef {
    pub component: usize,
    pub pin: usize,
}

/// A wire from an output pin to an input pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDescription {
    pub from: PinRef,
    pub to: PinRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced: Option<TriState>,
}

/// The structure of a circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDescription {
    pub components: Vec<ComponentSpec>,
    #[serde(default)]
    pub wires: Vec<WireDescription>,
}

impl CircuitDescription {
    /// Parse a description from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a description from MessagePack.
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    /// Encode as MessagePack. Structs are written as maps so that optional
    /// fields can be omitted.
    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }
}

impl Circuit {
    /// Snapshot the structure of this circuit.
    pub fn describe(&self) -> Result<CircuitDescription> {
        let positions: IndexMap<ComponentId, usize> = self
            .netlist
            .slots()
            .enumerate()
            .map(|(index, slot)| (slot.id(), index))
            .collect();

        let components = self
            .netlist
            .slots()
            .map(|slot| slot.component().spec())
            .collect();

        let mut wires = Vec::with_capacity(self.netlist.wire_count());
        for wire in self.netlist.wires() {
            let source = self.netlist.node(wire.source())?;
            let destination = self.netlist.node(wire.destination())?;
            let position = |id: ComponentId| {
                positions.get(&id).copied().ok_or_else(|| {
                    SimulationError::InvalidDescription(format!("wire {} has no owner {id}", wire.id()))
                })
            };

            wires.push(WireDescription {
                from: PinRef {
                    component: position(source.owner())?,
                    pin: source.pin(),
                },
                to: PinRef {
                    component: position(destination.owner())?,
                    pin: destination.pin(),
                },
                forced: wire.forced(),
            });
        }

        Ok(CircuitDescription { components, wires })
    }

    /// Build a circuit from a description.
    pub fn from_description(description: &CircuitDescription, config: SimulationConfig) -> Result<Self> {
        let mut circuit = Circuit::with_config(config);

        let ids = description
            .components
            .iter()
            .map(|spec| circuit.create_component(spec.clone()))
            .collect::<Result<Vec<_>>>()?;

        for (index, record) in description.wires.iter().enumerate() {
            let lookup = |pin: PinRef| {
                ids.get(pin.component).copied().ok_or_else(|| {
                    SimulationError::InvalidDescription(format!(
                        "wire {index} refers to component {} but there are only {}",
                        pin.component,
                        ids.len()
                    ))
                })
            };
            let from = lookup(record.from)?;
            let to = lookup(record.to)?;

            let wire = circuit
                .connect_pins(from, record.from.pin, to, record.to.pin)
                .map_err(|err| match err {
                    SimulationError::NoSuchPin { .. } => {
                        SimulationError::InvalidDescription(format!("wire {index}: {err}"))
                    }
                    other => other,
                })?;
            if record.forced.is_some() {
                circuit.set_wire_forced_value(wire, record.forced)?;
            }
        }

        tracing::debug!(
            components = ids.len(),
            wires = description.wires.len(),
            "loaded circuit description"
        );
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Edge, FlipFlopKind, GateType, LatchParams};

    const INVERTER: &str = r#"{
        "components": [
            { "type": "logic_input", "value": "true", "name": "A" },
            { "type": "gate", "gate_type": "NOT" },
            { "type": "logic_output", "name": "Y" }
        ],
        "wires": [
            { "from": { "component": 0, "pin": 0 }, "to": { "component": 1, "pin": 0 } },
            { "from": { "component": 1, "pin": 0 }, "to": { "component": 2, "pin": 0 } }
        ]
    }"#;

    #[test]
    fn loads_from_json() {
        let description = CircuitDescription::from_json(INVERTER).unwrap();
        assert_eq!(description.components.len(), 3);

        let mut circuit = Circuit::from_description(&description, SimulationConfig::default()).unwrap();
        circuit.tick().unwrap();

        let output = circuit.component_ids().nth(2).unwrap();
        assert_eq!(circuit.output_value(output).unwrap(), TriState::False);
    }

    #[test]
    fn describe_matches_the_loaded_description() {
        let description = CircuitDescription::from_json(INVERTER).unwrap();
        let circuit = Circuit::from_description(&description, SimulationConfig::default()).unwrap();
        assert_eq!(circuit.describe().unwrap(), description);
    }

    #[test]
    fn msgpack_keeps_every_variant() {
        let mut circuit = Circuit::new();
        let clock = circuit.create_component(ComponentSpec::clock(4, 50)).unwrap();
        let d = circuit.create_component(ComponentSpec::logic_input(TriState::Unset)).unwrap();
        let ff = circuit
            .create_component(ComponentSpec::flip_flop(FlipFlopKind::DMasterSlave, Edge::Falling))
            .unwrap();
        let latch = circuit
            .create_component(ComponentSpec::sr_latch(LatchParams {
                sync: true,
                stabilize: true,
                ..LatchParams::default()
            }))
            .unwrap();
        circuit.create_component(ComponentSpec::mux(8, 4)).unwrap();
        circuit.create_component(ComponentSpec::gate(GateType::Rnimply)).unwrap();

        circuit.connect_pins(d, 0, ff, 0).unwrap();
        circuit.connect_pins(clock, 0, ff, 1).unwrap();
        let wire = circuit.connect_pins(ff, 0, latch, 0).unwrap();
        circuit.set_wire_forced_value(wire, Some(TriState::True)).unwrap();

        let description = circuit.describe().unwrap();
        let bytes = description.to_msgpack().unwrap();
        let decoded = CircuitDescription::from_msgpack(&bytes).unwrap();
        assert_eq!(decoded, description);
        assert_eq!(decoded.wires[2].forced, Some(TriState::True));
    }

    #[test]
    fn ids_are_replaced_by_positions() {
        let mut circuit = Circuit::new();
        let scratch = circuit.create_component(ComponentSpec::gate(GateType::And)).unwrap();
        let a = circuit.create_component(ComponentSpec::logic_input(TriState::False)).unwrap();
        let b = circuit.create_component(ComponentSpec::logic_output()).unwrap();
        circuit.connect_pins(a, 0, b, 0).unwrap();
        circuit.destroy_component(scratch).unwrap();

        let description = circuit.describe().unwrap();
        assert_eq!(
            description.wires,
            vec![WireDescription {
                from: PinRef { component: 0, pin: 0 },
                to: PinRef { component: 1, pin: 0 },
                forced: None,
            }]
        );
    }

    #[test]
    fn rejects_out_of_range_references() {
        let mut description = CircuitDescription::from_json(INVERTER).unwrap();
        description.wires[0].to.component = 9;
        assert!(matches!(
            Circuit::from_description(&description, SimulationConfig::default()),
            Err(SimulationError::InvalidDescription(_))
        ));

        let mut description = CircuitDescription::from_json(INVERTER).unwrap();
        description.wires[0].to.pin = 3;
        assert!(matches!(
            Circuit::from_description(&description, SimulationConfig::default()),
            Err(SimulationError::InvalidDescription(_))
        ));
    }

    #[test]
    fn rejects_conflicting_wires() {
        let mut description = CircuitDescription::from_json(INVERTER).unwrap();
        let duplicate = description.wires[0].clone();
        description.wires.push(duplicate);
        assert!(matches!(
            Circuit::from_description(&description, SimulationConfig::default()),
            Err(SimulationError::ConnectionConflict { .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            CircuitDescription::from_json(r#"{ "components": [ { "type": "flux_capacitor" } ] }"#),
            Err(SimulationError::Json(_))
        ));
    }
}
