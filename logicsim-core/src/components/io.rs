//! Logic inputs and outputs.
//!
//! A logic input is a source whose value is set from outside the engine; a
//! logic output is a sink whose value is whatever reaches its single pin.

use serde::{Deserialize, Serialize};

use crate::logic::TriState;

fn default_input_value() -> TriState {
    TriState::False
}

/// Parameters of a logic input. The value is persisted with the circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicInputParams {
    #[serde(default = "default_input_value")]
    pub value: TriState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Default for LogicInputParams {
    fn default() -> Self {
        Self {
            value: default_input_value(),
            name: None,
        }
    }
}

/// A user-driven source with one output pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicInput {
    value: TriState,
    name: Option<String>,
}

impl LogicInput {
    pub fn new(params: LogicInputParams) -> Self {
        Self {
            value: params.value,
            name: params.name,
        }
    }

    pub fn params(&self) -> LogicInputParams {
        LogicInputParams {
            value: self.value,
            name: self.name.clone(),
        }
    }

    pub fn value(&self) -> TriState {
        self.value
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the value. Returns whether it changed.
    pub fn set(&mut self, value: TriState) -> bool {
        let changed = self.value != value;
        self.value = value;
        changed
    }

    /// Flip the value. An unset input becomes true.
    pub fn toggle(&mut self) -> TriState {
        self.value = match self.value {
            TriState::True => TriState::False,
            TriState::False | TriState::Unset => TriState::True,
        };
        self.value
    }
}

/// Parameters of a logic output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicOutputParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An observed sink with one input pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicOutput {
    params: LogicOutputParams,
}

impl LogicOutput {
    pub fn new(params: LogicOutputParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LogicOutputParams {
        &self.params
    }

    pub fn name(&self) -> Option<&str> {
        self.params.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_cycles_through_booleans() {
        let mut input = LogicInput::new(LogicInputParams {
            value: TriState::Unset,
            name: Some("A".into()),
        });
        assert_eq!(input.toggle(), TriState::True);
        assert_eq!(input.toggle(), TriState::False);
        assert_eq!(input.toggle(), TriState::True);
        assert_eq!(input.name(), Some("A"));
    }

    #[test]
    fn set_reports_change() {
        let mut input = LogicInput::new(LogicInputParams::default());
        assert_eq!(input.value(), TriState::False);
        assert!(!input.set(TriState::False));
        assert!(input.set(TriState::True));
        assert_eq!(input.params().value, TriState::True);
    }

    #[test]
    fn input_params_default_from_json() {
        let params: LogicInputParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, LogicInputParams::default());
    }
}
