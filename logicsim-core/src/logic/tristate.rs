//! Tri-state Values
//!
//! This module defines [`TriState`] and the boolean algebra over it.

use std::fmt;
use std::ops::Not;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A logic level: true, false, or not determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    True,
    False,
    /// No driver, or a driver that cannot decide.
    #[default]
    Unset,
}

impl TriState {
    /// Get the boolean value, if determined.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            TriState::True => Some(true),
            TriState::False => Some(false),
            TriState::Unset => None,
        }
    }

    /// Check whether the value is determined.
    pub fn is_set(self) -> bool {
        self != TriState::Unset
    }

    /// Check whether the value is undetermined.
    pub fn is_unset(self) -> bool {
        self == TriState::Unset
    }

    /// Apply a boolean function to two determined operands.
    ///
    /// Returns `Unset` as soon as either operand is unknown.
    fn combine(self, other: TriState, f: impl FnOnce(bool, bool) -> bool) -> TriState {
        match (self.as_bool(), other.as_bool()) {
            (Some(a), Some(b)) => f(a, b).into(),
            _ => TriState::Unset,
        }
    }

    pub fn and(self, other: TriState) -> TriState {
        self.combine(other, |a, b| a && b)
    }

    pub fn or(self, other: TriState) -> TriState {
        self.combine(other, |a, b| a || b)
    }

    pub fn xor(self, other: TriState) -> TriState {
        self.combine(other, |a, b| a != b)
    }

    pub fn nand(self, other: TriState) -> TriState {
        self.combine(other, |a, b| !(a && b))
    }

    pub fn nor(self, other: TriState) -> TriState {
        self.combine(other, |a, b| !(a || b))
    }

    pub fn xnor(self, other: TriState) -> TriState {
        self.combine(other, |a, b| a == b)
    }

    /// Material implication: `!a || b`.
    pub fn imply(self, other: TriState) -> TriState {
        self.combine(other, |a, b| !a || b)
    }

    /// Reverse implication: `a || !b`.
    pub fn rimply(self, other: TriState) -> TriState {
        self.combine(other, |a, b| a || !b)
    }

    /// Non-implication: `a && !b`.
    pub fn nimply(self, other: TriState) -> TriState {
        self.combine(other, |a, b| a && !b)
    }

    /// Reverse non-implication: `!a && b`.
    pub fn rnimply(self, other: TriState) -> TriState {
        self.combine(other, |a, b| !a && b)
    }
}

impl Not for TriState {
    type Output = TriState;

    /// Boolean negation; `Unset` stays `Unset`.
    fn not(self) -> TriState {
        match self {
            TriState::True => TriState::False,
            TriState::False => TriState::True,
            TriState::Unset => TriState::Unset,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(TriState::Unset, TriState::from)
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            TriState::True => "1",
            TriState::False => "0",
            TriState::Unset => "?",
        };
        f.write_str(symbol)
    }
}

/// Error returned when parsing a [`TriState`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid logic level '{0}': expected 1, 0, ?, true, false or unset")]
pub struct ParseTriStateError(String);

impl FromStr for TriState {
    type Err = ParseTriStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(TriState::True),
            "0" | "false" => Ok(TriState::False),
            "?" | "unset" => Ok(TriState::Unset),
            _ => Err(ParseTriStateError(s.to_string())),
        }
    }
}
