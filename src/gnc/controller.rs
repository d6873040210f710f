use crate::dynamics::state::State;

use super::guidance::Phase;

/// Output of one guidance update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceCommand {
    pub alpha: f64,        // commanded angle of attack, rad
    pub phase: Phase,      // phase that produced this command
    pub next_phase: Phase, // phase active from the next step on
}

/// Trait for guidance laws.
///
/// Implement this to drive the simulation loop with a custom law
/// (e.g. a pure ballistic drop for comparison runs).
pub trait Controller {
    /// Compute the angle-of-attack command for the coming step.
    fn control(&mut self, state: &State, dt: f64) -> GuidanceCommand;

    /// Reset internal state (phase, line-of-sight memory).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
