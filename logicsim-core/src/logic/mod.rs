//! Signal Values
//!
//! Every node in a circuit carries a [`TriState`]: a boolean that may also be
//! undetermined. Undetermined values show up whenever a pin is not wired, a
//! latch is in a conflicting state, or a selector cannot be decoded.
//!
//! # Absorption
//!
//! `Unset` is absorbing for every two-input operator: if either operand is
//! unknown, the result is unknown. None of the operators try to resolve an
//! unknown operand through short-circuiting (for instance `false AND ?` is
//! still `?`). This keeps the gate truth tables uniform and makes wiring
//! mistakes visible instead of silently masking them.

mod tristate;

pub use tristate::{ParseTriStateError, TriState};
