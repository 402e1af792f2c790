//! Caller-owned simulation facade.
//!
//! Ties the two pure entry points to the state the presentation layer
//! actually holds: the current parameter set, the link budget memoized for
//! it, and the frame clock. There are no process-wide singletons; every
//! consumer owns its own [`LinkSimulation`] value.

use crate::time_driver::SimulationClock;

use super::link_budget;
use super::node_cycle;
use super::types::{LinkBudget, LinkParameters, NodeOperationalState};

/// One simulated link: parameters, memoized metrics, and the frame clock.
///
/// The link budget is cached keyed on the full parameter set. Replacing the
/// parameters with an equal value keeps the cache; any differing value drops
/// it, and the next [`metrics`](Self::metrics) call recomputes. Since
/// evaluation is pure, recomputing and reusing are indistinguishable to the
/// caller.
pub struct LinkSimulation {
    params: LinkParameters,
    budget: Option<LinkBudget>,
    clock: SimulationClock,
}

impl LinkSimulation {
    /// A simulation with a running clock at frame 0 and no metrics computed
    /// yet.
    pub fn new(params: LinkParameters) -> Self {
        Self {
            params,
            budget: None,
            clock: SimulationClock::new(),
        }
    }

    /// The current parameter snapshot.
    pub fn parameters(&self) -> &LinkParameters {
        &self.params
    }

    /// Replace the parameter set wholesale, invalidating the cached metrics
    /// only if the new value actually differs.
    pub fn set_parameters(&mut self, params: LinkParameters) {
        if params != self.params {
            self.params = params;
            self.budget = None;
        }
    }

    /// Link-budget metrics for the current parameters, computed on first
    /// access and cached until the parameters change.
    pub fn metrics(&mut self) -> &LinkBudget {
        let params = &self.params;
        self.budget.get_or_insert_with(|| {
            let budget = link_budget::evaluate(params);
            log::debug!(
                "Link budget recomputed: SNR {:.1} dB, margin {:.1} dB",
                budget.snr_db,
                budget.link_margin_db
            );
            budget
        })
    }

    /// The frame clock.
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Mutable access to the frame clock, for pause and resume.
    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    /// Advance the clock by one frame and return the frame index together
    /// with the node state and signal strength for that frame. While the
    /// clock is paused this re-reports the retained frame.
    pub fn advance(&mut self) -> (u64, NodeOperationalState, f64) {
        let frame = self.clock.tick();
        let (state, strength) = node_cycle::phase(frame);
        (frame, state, strength)
    }
}
