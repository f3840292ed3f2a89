//! Gates
//!
//! Combinational gates: ten two-input operators and the inverter. A gate
//! has no state besides its type; its output is a pure function of its
//! inputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pin;
use crate::logic::TriState;

/// The operator a gate applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateType {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
    Imply,
    Rimply,
    Nimply,
    Rnimply,
    /// The inverter, the only one-input gate.
    Not,
}

impl GateType {
    /// Every gate type, two-input operators first.
    pub const ALL: [GateType; 11] = [
        GateType::And,
        GateType::Or,
        GateType::Xor,
        GateType::Nand,
        GateType::Nor,
        GateType::Xnor,
        GateType::Imply,
        GateType::Rimply,
        GateType::Nimply,
        GateType::Rnimply,
        GateType::Not,
    ];

    pub fn num_inputs(self) -> usize {
        match self {
            GateType::Not => 1,
            _ => 2,
        }
    }

    /// Get the mirrored variant of an asymmetric gate.
    ///
    /// Only the implication family has one: `IMPLY↔RIMPLY` and
    /// `NIMPLY↔RNIMPLY`. Swapping keeps the wiring and mirrors the operands.
    pub fn mirrored(self) -> Option<GateType> {
        match self {
            GateType::Imply => Some(GateType::Rimply),
            GateType::Rimply => Some(GateType::Imply),
            GateType::Nimply => Some(GateType::Rnimply),
            GateType::Rnimply => Some(GateType::Nimply),
            _ => None,
        }
    }

    /// Apply the operator to input values given in pin order.
    pub fn eval(self, inputs: &[TriState]) -> TriState {
        let a = pin(inputs, 0);
        if self == GateType::Not {
            return !a;
        }

        let b = pin(inputs, 1);
        match self {
            GateType::And => a.and(b),
            GateType::Or => a.or(b),
            GateType::Xor => a.xor(b),
            GateType::Nand => a.nand(b),
            GateType::Nor => a.nor(b),
            GateType::Xnor => a.xnor(b),
            GateType::Imply => a.imply(b),
            GateType::Rimply => a.rimply(b),
            GateType::Nimply => a.nimply(b),
            GateType::Rnimply => a.rnimply(b),
            GateType::Not => !a,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GateType::And => "AND",
            GateType::Or => "OR",
            GateType::Xor => "XOR",
            GateType::Nand => "NAND",
            GateType::Nor => "NOR",
            GateType::Xnor => "XNOR",
            GateType::Imply => "IMPLY",
            GateType::Rimply => "RIMPLY",
            GateType::Nimply => "NIMPLY",
            GateType::Rnimply => "RNIMPLY",
            GateType::Not => "NOT",
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gate type '{0}'")]
pub struct ParseGateTypeError(String);

impl FromStr for GateType {
    type Err = ParseGateTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GateType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseGateTypeError(s.to_string()))
    }
}

/// Parameters of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateParams {
    pub gate_type: GateType,
}

/// A gate instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    gate_type: GateType,
}

impl Gate {
    pub fn new(gate_type: GateType) -> Self {
        Self { gate_type }
    }

    pub fn gate_type(&self) -> GateType {
        self.gate_type
    }

    /// Swap to the mirrored variant. Returns whether the type changed.
    pub fn swap_variant(&mut self) -> bool {
        match self.gate_type.mirrored() {
            Some(mirrored) => {
                self.gate_type = mirrored;
                true
            }
            None => false,
        }
    }

    pub fn recompute(&self, inputs: &[TriState]) -> TriState {
        self.gate_type.eval(inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::TriState::{False as F, True as T, Unset as U};

    /// Expected outputs for (F,F), (F,T), (T,F), (T,T).
    fn table(gate_type: GateType) -> [TriState; 4] {
        match gate_type {
            GateType::And => [F, F, F, T],
            GateType::Or => [F, T, T, T],
            GateType::Xor => [F, T, T, F],
            GateType::Nand => [T, T, T, F],
            GateType::Nor => [T, F, F, F],
            GateType::Xnor => [T, F, F, T],
            GateType::Imply => [T, T, F, T],
            GateType::Rimply => [T, F, T, T],
            GateType::Nimply => [F, F, T, F],
            GateType::Rnimply => [F, T, F, F],
            GateType::Not => unreachable!("inverter has one input"),
        }
    }

    #[test]
    fn two_input_truth_tables_cover_all_nine_pairs() {
        for gate_type in GateType::ALL.into_iter().filter(|t| t.num_inputs() == 2) {
            let gate = Gate::new(gate_type);
            let expected = table(gate_type);

            for a in [T, F, U] {
                for b in [T, F, U] {
                    let out = gate.recompute(&[a, b]);
                    let want = match (a.as_bool(), b.as_bool()) {
                        (Some(a), Some(b)) => expected[(a as usize) * 2 + b as usize],
                        _ => U,
                    };
                    assert_eq!(out, want, "{gate_type}({a}, {b})");
                }
            }
        }
    }

    #[test]
    fn inverter() {
        let gate = Gate::new(GateType::Not);
        assert_eq!(gate.recompute(&[T]), F);
        assert_eq!(gate.recompute(&[F]), T);
        assert_eq!(gate.recompute(&[U]), U);
        // Missing pin reads as unconnected.
        assert_eq!(gate.recompute(&[]), U);
    }

    #[test]
    fn swap_variant_only_touches_implication_family() {
        let mut gate = Gate::new(GateType::Imply);
        assert!(gate.swap_variant());
        assert_eq!(gate.gate_type(), GateType::Rimply);
        assert!(gate.swap_variant());
        assert_eq!(gate.gate_type(), GateType::Imply);

        let mut gate = Gate::new(GateType::Nimply);
        assert!(gate.swap_variant());
        assert_eq!(gate.gate_type(), GateType::Rnimply);

        let mut gate = Gate::new(GateType::Xor);
        assert!(!gate.swap_variant());
        assert_eq!(gate.gate_type(), GateType::Xor);
    }

    #[test]
    fn parse_gate_type() {
        assert_eq!("nand".parse::<GateType>(), Ok(GateType::Nand));
        assert_eq!(" RNIMPLY ".parse::<GateType>(), Ok(GateType::Rnimply));
        assert!("MAYBE".parse::<GateType>().is_err());
        for t in GateType::ALL {
            assert_eq!(t.to_string().parse::<GateType>(), Ok(t));
        }
    }
}
