//! Update Scheduler
//!
//! The scheduler drives one simulation step across the whole netlist. It
//! ensures that, wherever the wiring is acyclic, a component is recomputed
//! after the components feeding it.
//!
//! # Algorithm
//!
//! Each tick:
//!
//! 1. Advance the tick counter and mark every clock dirty
//! 2. Snapshot the dirty set and sort it topologically over the wires
//!    between its members (Kahn's algorithm)
//! 3. Recompute each component in that order: pull its inputs through their
//!    wires, compute, write outputs
//! 4. For every output whose value changed, mark the components it feeds as
//!    dirty for the next pass
//! 5. Repeat from 2 until nothing is dirty or the pass cap is reached
//!
//! # Sequential Components
//!
//! Latches and flip-flops sample their inputs as they were before the pass.
//! Their outputs are written only after every component of the pass has
//! been computed, and wires leaving them add no ordering constraint. Two
//! flip-flops on the same clock edge therefore never see each other's new
//! state: a shift register moves one stage per edge.
//!
//! Since no ordering edge leaves a sequential component, any cycle left in
//! the sort is purely combinational. The scheduler releases its oldest
//! member, which keeps runs reproducible.
//!
//! A pure combinational loop can flip forever. Hitting the pass cap leaves
//! every output at its current value, keeps the unsettled components dirty
//! for the next tick, and reports [`SimulationError::OscillationLimitExceeded`].

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use super::netlist::Netlist;
use crate::components::{ComponentId, Step};
use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};

/// Summary of one completed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// The tick that ran (the first tick is 1).
    pub tick: u64,
    /// Number of propagation passes.
    pub passes: usize,
    /// Number of component recomputations across all passes.
    pub recomputed: usize,
}

/// The update scheduler owns the tick counter and the pass cap.
#[derive(Debug, Clone, Default)]
pub struct UpdateScheduler {
    config: SimulationConfig,
    tick: u64,
}

impl UpdateScheduler {
    /// Create a new scheduler.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config, tick: 0 }
    }

    /// The configuration applied to each tick.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next tick.
    pub fn set_config(&mut self, config: SimulationConfig) {
        self.config = config;
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Run one tick over the netlist.
    pub fn tick(&mut self, netlist: &mut Netlist) -> Result<TickReport> {
        self.tick += 1;
        let step = Step { tick: self.tick };

        let clocks: Vec<ComponentId> = netlist
            .slots()
            .filter(|slot| slot.component().is_clocked_source())
            .map(|slot| slot.id())
            .collect();
        for clock in clocks {
            netlist.mark_dirty(clock);
        }

        let cap = self.config.pass_cap();
        let mut passes = 0;
        let mut recomputed = 0;

        while netlist.has_dirty() {
            if passes == cap {
                let pending = netlist.dirty();
                tracing::warn!(
                    tick = self.tick,
                    passes,
                    pending = ?pending,
                    "propagation did not stabilize; outputs frozen until next tick"
                );
                return Err(SimulationError::OscillationLimitExceeded {
                    tick: self.tick,
                    passes,
                    pending,
                });
            }
            passes += 1;

            let order = self.topological_order(netlist, &netlist.dirty());
            tracing::trace!(tick = self.tick, pass = passes, components = order.len(), "propagation pass");

            let mut deferred = Vec::new();
            for id in order {
                let outputs = netlist.evaluate(id, step)?;
                recomputed += 1;
                if netlist.slot(id)?.component().is_sequential() {
                    deferred.push((id, outputs));
                    continue;
                }
                let changed = netlist.commit(id, &outputs)?;
                tracing::trace!(tick = self.tick, component = %id, changed, "recomputed");
            }
            for (id, outputs) in deferred {
                let changed = netlist.commit(id, &outputs)?;
                tracing::trace!(tick = self.tick, component = %id, changed, "recomputed sequential");
            }
        }

        Ok(TickReport {
            tick: self.tick,
            passes,
            recomputed,
        })
    }

    /// Perform a topological sort of the given components.
    ///
    /// Returns every component exactly once, in an order where, outside of
    /// combinational cycles, producers come before consumers. Sequential
    /// components are not producers here: their outputs are written at the
    /// end of the pass.
    pub fn topological_order(&self, netlist: &Netlist, components: &[ComponentId]) -> Vec<ComponentId> {
        let members: IndexSet<ComponentId> = components.iter().copied().collect();
        let mut in_degree: IndexMap<ComponentId, usize> = members.iter().map(|&id| (id, 0)).collect();
        let mut edges: IndexMap<ComponentId, Vec<ComponentId>> = IndexMap::new();

        // Count edges within the set; self-loops never block a component.
        for &id in &members {
            let sequential = netlist
                .slot(id)
                .map(|slot| slot.component().is_sequential())
                .unwrap_or(false);
            if sequential {
                continue;
            }
            let targets: Vec<ComponentId> = netlist
                .dependents(id)
                .into_iter()
                .filter(|target| *target != id && members.contains(target))
                .collect();
            for target in &targets {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree += 1;
                }
            }
            edges.insert(id, targets);
        }

        let mut result = Vec::with_capacity(members.len());
        let mut done: IndexSet<ComponentId> = IndexSet::with_capacity(members.len());
        let mut queue: VecDeque<ComponentId> = members
            .iter()
            .copied()
            .filter(|id| in_degree.get(id) == Some(&0))
            .collect();

        while done.len() < members.len() {
            // Kahn's algorithm
            while let Some(id) = queue.pop_front() {
                if !done.insert(id) {
                    continue;
                }
                result.push(id);

                for target in edges.get(&id).map(Vec::as_slice).unwrap_or_default() {
                    if let Some(degree) = in_degree.get_mut(target) {
                        *degree = degree.saturating_sub(1);
                        if *degree == 0 && !done.contains(target) {
                            queue.push_back(*target);
                        }
                    }
                }
            }

            // Stalled on a cycle: release one member and carry on.
            if let Some(next) = members.iter().copied().filter(|id| !done.contains(id)).min() {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree = 0;
                }
                queue.push_back(next);
            }
        }

        result
    }
}
