use crate::dynamics::state::State;
use crate::gnc::Phase;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Release,
    PhaseChange { from: Phase, to: Phase },
    Impact,
    TimeLimit,
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: State,
}

impl SimEvent {
    pub fn new(kind: EventKind, state: &State) -> Self {
        Self { time: state.time, kind, state: state.clone() }
    }
}

/// Phases in the order they were entered, starting with RELEASE.
pub fn phase_sequence(events: &[SimEvent]) -> Vec<Phase> {
    let mut phases = vec![Phase::Release];
    phases.extend(events.iter().filter_map(|e| match e.kind {
        EventKind::PhaseChange { to, .. } => Some(to),
        _ => None,
    }));
    phases
}

/// Time at which `phase` was entered, if it was.
pub fn phase_entry_time(events: &[SimEvent], phase: Phase) -> Option<f64> {
    if phase == Phase::Release {
        return Some(0.0);
    }
    events.iter().find_map(|e| match e.kind {
        EventKind::PhaseChange { to, .. } if to == phase => Some(e.time),
        _ => None,
    })
}
