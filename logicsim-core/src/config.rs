//! Simulation configuration.
//!
//! The only tunable today is the propagation pass cap. It bounds the work a
//! single tick may do when the user wires a combinational loop that never
//! settles (a ring oscillator, or an XOR feeding itself).
//!
//! ```ignore
//! use logicsim_core::SimulationConfig;
//! let cfg = SimulationConfig::default().with_max_passes_per_tick(8);
//! ```

use serde::{Deserialize, Serialize};

/// Default number of propagation passes allowed per tick.
pub const DEFAULT_MAX_PASSES_PER_TICK: usize = 32;

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Passes after which a tick gives up and reports an oscillation.
    /// Values below one are treated as one.
    pub max_passes_per_tick: usize,
}

impl SimulationConfig {
    pub fn new(max_passes_per_tick: usize) -> Self {
        Self {
            max_passes_per_tick,
        }
    }

    pub fn with_max_passes_per_tick(mut self, passes: usize) -> Self {
        self.max_passes_per_tick = passes;
        self
    }

    /// The pass cap actually applied.
    pub fn pass_cap(&self) -> usize {
        self.max_passes_per_tick.max(1)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PASSES_PER_TICK)
    }
}
