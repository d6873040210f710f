use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::gnc::{FlightMode, Phase};
use crate::sim::event::phase_entry_time;
use crate::sim::{Release, Termination, Trajectory};

/// Time each guidance phase was entered, in unscaled seconds since release.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseEntry {
    pub phase: Phase,
    pub time: f64,
}

/// Summary statistics computed from a simulated drop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub release: Release,
    pub mode: FlightMode,
    pub profile: &'static str,
    pub flight_time_s: f64,
    pub raw_time_s: f64,
    pub terminal_distance_m: f64,
    pub max_speed_ms: f64,
    pub impact_speed_ms: f64,
    pub termination: Termination,
    pub phases: Vec<PhaseEntry>,
}

impl FlightSummary {
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let max_speed = trajectory
            .history
            .iter()
            .map(|s| s.speed)
            .fold(0.0_f64, f64::max);

        let impact_speed = trajectory
            .events
            .last()
            .map(|e| e.state.speed())
            .or_else(|| trajectory.history.last().map(|s| s.speed))
            .unwrap_or(0.0);

        let phases = trajectory
            .phases()
            .into_iter()
            .filter_map(|phase| {
                phase_entry_time(&trajectory.events, phase).map(|time| PhaseEntry { phase, time })
            })
            .collect();

        FlightSummary {
            release: trajectory.release,
            mode: trajectory.mode(),
            profile: trajectory.profile.name,
            flight_time_s: trajectory.flight_time,
            raw_time_s: trajectory.raw_time,
            terminal_distance_m: trajectory.terminal_distance,
            max_speed_ms: max_speed.max(impact_speed),
            impact_speed_ms: impact_speed,
            termination: trajectory.termination,
            phases,
        }
    }
}

/// Write a flight summary as pretty-printed JSON.
pub fn write_summary<W: Write>(writer: W, summary: &FlightSummary) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, summary)
}

/// Write a flight summary JSON file at the given path.
pub fn write_summary_file<P: AsRef<Path>>(path: P, summary: &FlightSummary) -> serde_json::Result<()> {
    let file = File::create(path).map_err(serde_json::Error::io)?;
    let mut writer = BufWriter::new(file);
    write_summary(&mut writer, summary)?;
    writer.flush().map_err(serde_json::Error::io)
}
