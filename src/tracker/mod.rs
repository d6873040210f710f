//! Live time-to-impact tracking for released munitions.
//!
//! Each release is simulated once up front; afterwards the tracker only
//! compares the predicted impact instant against the wall clock.

pub mod clock;
pub mod log;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dynamics::state::SimConfig;
use crate::error::SimError;
use crate::gnc::FlightMode;
use crate::physics::atmosphere;
use crate::sim::{simulate_airframe, FlightSample, Release, Trajectory};
use crate::vehicle::{presets, Airframe};

pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::log::RollingLog;

use self::clock::{delta_seconds, seconds_to_delta};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub grace_period: f64,       // s a record survives after its impact instant
    pub log_capacity: usize,     // lines kept by the rolling log
    pub fallback_range: f64,     // m, used when no valid target distance is given
    pub fallback_altitude: f64,  // m, used when the reported altitude is not finite
    pub fallback_speed: f64,     // km/h, used when the reported TAS is not finite or negative
    pub tti_error_fraction: f64, // error margin as a fraction of total TTI
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            grace_period: 5.0,
            log_capacity: 20,
            fallback_range: 15_000.0,
            fallback_altitude: 0.0,
            fallback_speed: 0.0,
            tti_error_fraction: 0.05,
        }
    }
}

// ---------------------------------------------------------------------------
// Records and views
// ---------------------------------------------------------------------------

/// Release conditions as reported by the launch platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReleaseTelemetry {
    pub altitude_m: f64,
    pub speed_tas_kmh: f64,
    pub pitch_deg: f64, // recorded only; the simulation starts level
    pub target_distance_m: f64,
}

/// One tracked munition.
#[derive(Debug, Clone)]
pub struct BombRecord {
    pub id: u32,
    pub label: String,
    pub released_at: DateTime<Utc>,
    pub impact_at: DateTime<Utc>,
    pub telemetry: ReleaseTelemetry,
    pub trajectory: Trajectory,
}

impl BombRecord {
    pub fn mode(&self) -> FlightMode {
        self.trajectory.mode()
    }

    /// Predicted time of flight, s.
    pub fn total_tti(&self) -> f64 {
        self.trajectory.flight_time
    }

    /// Seconds until impact; negative once the impact instant has passed.
    pub fn remaining(&self, now: DateTime<Utc>) -> f64 {
        delta_seconds(self.impact_at - now)
    }

    /// Seconds since release.
    pub fn elapsed(&self, now: DateTime<Utc>) -> f64 {
        delta_seconds(now - self.released_at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Flying,
    Impact,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Flying => f.pad("FLYING"),
            Status::Impact => f.pad("IMPACT"),
        }
    }
}

/// Snapshot of a tracked munition at query time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveBomb {
    pub id: u32,
    pub label: String,
    pub remaining: f64, // s, negative once impact has passed
    pub status: Status,
    pub mode: FlightMode,
    pub total_tti: f64,
    pub error_margin: f64,
}

/// Time-to-impact estimate for a hypothetical release.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub mode: FlightMode,
    pub tti: f64,
    pub error_margin: f64,
    pub target_distance: f64,
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Registry of in-flight munitions plus a rolling event log.
pub struct Tracker<C: Clock = SystemClock> {
    config: TrackerConfig,
    sim_config: SimConfig,
    airframe: Airframe,
    clock: C,
    bombs: Vec<BombRecord>,
    next_id: u32,
    log: RollingLog,
}

impl Tracker<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock, TrackerConfig::default(), SimConfig::default())
    }
}

impl Default for Tracker<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Tracker<C> {
    pub fn with_clock(clock: C, config: TrackerConfig, sim_config: SimConfig) -> Self {
        let log = RollingLog::new(config.log_capacity);
        Self {
            config,
            sim_config,
            airframe: presets::gbu62(),
            clock,
            bombs: Vec::new(),
            next_id: 0,
            log,
        }
    }

    /// Replace the simulated airframe for subsequent releases.
    pub fn with_airframe(mut self, airframe: Airframe) -> Self {
        self.airframe = airframe;
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Register a release and return its id.
    ///
    /// A missing or invalid target distance, a non-finite altitude and a
    /// non-finite or negative speed are each replaced by the configured
    /// fallback and logged. If the simulation itself fails the release is
    /// logged and dropped: no record is added and no id is consumed.
    pub fn add_bomb(
        &mut self,
        altitude_m: f64,
        speed_tas_kmh: f64,
        pitch_deg: f64,
        target_distance_m: Option<f64>,
    ) -> Option<u32> {
        let input = self.config.resolve(altitude_m, speed_tas_kmh, target_distance_m);
        for note in &input.notes {
            warn!(target: "glide_sim::tracker", "{note}");
            self.log.push(self.clock.now(), note);
        }
        let ResolvedRelease { altitude_m, speed_tas_kmh, range, .. } = input;

        let release = Release::new(altitude_m, tas_to_mach(altitude_m, speed_tas_kmh), range);
        let trajectory = match simulate_airframe(&release, &self.airframe, &self.sim_config) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, altitude_m, speed_tas_kmh, "release rejected");
                self.log(format!("DROP REJECTED: {e}"));
                return None;
            }
        };

        self.next_id += 1;
        let id = self.next_id;
        let released_at = self.clock.now();
        let impact_at = released_at + seconds_to_delta(trajectory.flight_time);

        self.log(format!(
            "DROP: {altitude_m:.0}m | M{:.2} | Mode: {}",
            trajectory.release.mach,
            trajectory.mode()
        ));
        self.log(format!("DIST: {range:.0}m"));
        self.log(format!("RELEASED! TTI: {:.1}s", trajectory.flight_time));

        self.bombs.push(BombRecord {
            id,
            label: format!("GBU-{id}"),
            released_at,
            impact_at,
            telemetry: ReleaseTelemetry {
                altitude_m,
                speed_tas_kmh,
                pitch_deg,
                target_distance_m: range,
            },
            trajectory,
        });
        Some(id)
    }

    /// Drop records whose impact instant plus the grace period has passed.
    pub fn update(&mut self) {
        let now = self.clock.now();
        let grace = seconds_to_delta(self.config.grace_period);
        let before = self.bombs.len();
        self.bombs.retain(|b| now < b.impact_at + grace);
        let removed = before - self.bombs.len();
        if removed > 0 {
            info!(removed, remaining = self.bombs.len(), "pruned impacted records");
        }
    }

    /// Remaining time and status of every tracked record, in release order.
    pub fn active_bombs(&self) -> Vec<ActiveBomb> {
        let now = self.clock.now();
        self.bombs
            .iter()
            .map(|b| {
                let remaining = b.remaining(now);
                let total_tti = b.total_tti();
                ActiveBomb {
                    id: b.id,
                    label: b.label.clone(),
                    remaining,
                    status: if remaining > 0.0 { Status::Flying } else { Status::Impact },
                    mode: b.mode(),
                    total_tti,
                    error_margin: total_tti * self.config.tti_error_fraction,
                }
            })
            .collect()
    }

    /// Time-to-impact for a hypothetical release, without tracking it.
    pub fn predict(
        &self,
        altitude_m: f64,
        speed_tas_kmh: f64,
        target_distance_m: Option<f64>,
    ) -> Result<Prediction, SimError> {
        let input = self.config.resolve(altitude_m, speed_tas_kmh, target_distance_m);
        for note in &input.notes {
            warn!(target: "glide_sim::tracker", "prediction: {note}");
        }
        let range = input.range;
        let mach = tas_to_mach(input.altitude_m, input.speed_tas_kmh);
        let trajectory =
            simulate_airframe(&Release::new(input.altitude_m, mach, range), &self.airframe, &self.sim_config)?;
        Ok(Prediction {
            mode: trajectory.mode(),
            tti: trajectory.flight_time,
            error_margin: trajectory.flight_time * self.config.tti_error_fraction,
            target_distance: range,
        })
    }

    /// Sampled flight state of a record at the current elapsed time.
    pub fn attitude(&self, id: u32) -> Option<&FlightSample> {
        let now = self.clock.now();
        let record = self.get(id)?;
        record.trajectory.history.sample_at(record.elapsed(now))
    }

    pub fn get(&self, id: u32) -> Option<&BombRecord> {
        self.bombs.iter().find(|b| b.id == id)
    }

    pub fn bombs(&self) -> &[BombRecord] {
        &self.bombs
    }

    pub fn len(&self) -> usize {
        self.bombs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bombs.is_empty()
    }

    /// Append a timestamped line to the rolling log.
    pub fn log(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        info!(target: "glide_sim::tracker", "{message}");
        self.log.push(self.clock.now(), message);
    }

    /// Log lines, oldest first.
    pub fn logs(&self) -> Vec<String> {
        self.log.to_vec()
    }
}

// ---------------------------------------------------------------------------
// Input substitution
// ---------------------------------------------------------------------------

/// Release inputs after fallback substitution, one note per substituted value.
#[derive(Debug, Clone, PartialEq)]
struct ResolvedRelease {
    altitude_m: f64,
    speed_tas_kmh: f64,
    range: f64,
    notes: Vec<String>,
}

impl TrackerConfig {
    fn resolve(
        &self,
        altitude_m: f64,
        speed_tas_kmh: f64,
        target_distance_m: Option<f64>,
    ) -> ResolvedRelease {
        let mut notes = Vec::new();

        let altitude_m = if altitude_m.is_finite() {
            altitude_m
        } else {
            notes.push(format!("INVALID ALT {altitude_m}, using {:.0}m", self.fallback_altitude));
            self.fallback_altitude
        };

        let speed_tas_kmh = if speed_tas_kmh.is_finite() && speed_tas_kmh >= 0.0 {
            speed_tas_kmh
        } else {
            notes.push(format!("INVALID TAS {speed_tas_kmh}, using {:.0}km/h", self.fallback_speed));
            self.fallback_speed
        };

        let range = match target_distance_m {
            Some(d) if d.is_finite() && d > 0.0 => d,
            Some(d) => {
                notes.push(format!("INVALID DIST {d}, using {:.0}m", self.fallback_range));
                self.fallback_range
            }
            None => self.fallback_range,
        };

        ResolvedRelease { altitude_m, speed_tas_kmh, range, notes }
    }
}

/// Convert true airspeed in km/h to Mach at the release altitude.
fn tas_to_mach(altitude_m: f64, speed_tas_kmh: f64) -> f64 {
    speed_tas_kmh / 3.6 / atmosphere::sound_speed(altitude_m)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
