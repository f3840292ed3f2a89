//! Clock
//!
//! A periodic source. The level is a function of the tick counter only, so
//! a simulation replays identically regardless of frame timing.
//!
//! The clock anchors its phase on the first tick it observes. From then on,
//! with `phase = (tick - origin) % period`, the output is high while
//! `phase < period * duty_cycle / 100`.

use serde::{Deserialize, Serialize};

use super::{ComponentKind, Step};
use crate::error::{Result, SimulationError};
use crate::logic::TriState;

/// Parameters of a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockParams {
    /// Length of one cycle, in ticks.
    pub period: u32,
    /// Percentage of the period during which the output is high.
    pub duty_cycle: u32,
}

impl ClockParams {
    fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(invalid("period must be at least one tick"));
        }
        if self.duty_cycle > 100 {
            return Err(invalid(format!(
                "duty cycle {}% is above 100%",
                self.duty_cycle
            )));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> SimulationError {
    SimulationError::InvalidParameters {
        component: ComponentKind::Clock,
        reason: reason.into(),
    }
}

/// A clock instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    params: ClockParams,
    /// Tick at which the clock first ran; phase zero.
    origin: Option<u64>,
}

impl Clock {
    pub fn new(params: ClockParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            origin: None,
        })
    }

    pub fn params(&self) -> ClockParams {
        self.params
    }

    /// Number of ticks per period during which the output is high.
    pub fn high_ticks(&self) -> u64 {
        u64::from(self.params.period) * u64::from(self.params.duty_cycle) / 100
    }

    /// Level at a given phase within the period.
    pub fn level_at(&self, phase: u64) -> TriState {
        (phase % u64::from(self.params.period) < self.high_ticks()).into()
    }

    pub fn recompute(&mut self, step: Step) -> TriState {
        let origin = *self.origin.get_or_insert(step.tick);
        self.level_at(step.tick.saturating_sub(origin))
    }
}
