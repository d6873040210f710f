use serde::Serialize;
use tracing::debug;

use crate::dynamics::state::{SimConfig, State};
use crate::dynamics::BodyModel;
use crate::error::SimError;
use crate::gnc::{classify, Classification, Controller, FlightMode, GlideGuidance, Phase};
use crate::physics::atmosphere;
use crate::vehicle::{presets, profile_for, AeroProfile, Airframe};

use super::event::{self, EventKind, SimEvent};
use super::history::{FlightSample, History};
use super::integrator;

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Release conditions of one munition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Release {
    pub altitude: f64,     // m
    pub mach: f64,
    pub target_range: f64, // m of ground range to the target
}

impl Release {
    pub fn new(altitude: f64, mach: f64, target_range: f64) -> Self {
        Self { altitude, mach, target_range }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.altitude.is_finite() {
            return Err(SimError::NonFiniteAltitude(self.altitude));
        }
        if !self.mach.is_finite() || self.mach < 0.0 {
            return Err(SimError::InvalidMach(self.mach));
        }
        if !self.target_range.is_finite() || self.target_range <= 0.0 {
            return Err(SimError::InvalidRange(self.target_range));
        }
        Ok(())
    }
}

/// Why integration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Termination {
    Impact,
    TimeLimit,
}

/// Raw output of the integration loop.
#[derive(Debug, Clone)]
pub struct Flight {
    pub final_state: State,
    pub steps: u32,
    pub history: History,
    pub events: Vec<SimEvent>,
    pub termination: Termination,
}

/// Complete, immutable result of one simulation run.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub release: Release,
    pub classification: Classification,
    pub profile: &'static AeroProfile,
    pub flight_time: f64,       // s, calibrated by the profile time scale
    pub raw_time: f64,          // s, integration time
    pub terminal_distance: f64, // m downrange at termination
    pub termination: Termination,
    pub history: History,
    pub events: Vec<SimEvent>,
}

impl Trajectory {
    pub fn mode(&self) -> FlightMode {
        self.classification.mode
    }

    /// Phases in the order they were entered.
    pub fn phases(&self) -> Vec<Phase> {
        event::phase_sequence(&self.events)
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Simulate a GBU-62 release from start to ground impact (or the time ceiling).
pub fn simulate(release: &Release, config: &SimConfig) -> Result<Trajectory, SimError> {
    simulate_airframe(release, &presets::gbu62(), config)
}

/// Simulate a release of any airframe with the guidance law of its flight mode.
pub fn simulate_airframe(
    release: &Release,
    airframe: &Airframe,
    config: &SimConfig,
) -> Result<Trajectory, SimError> {
    release.validate()?;
    if !config.dt.is_finite() || config.dt <= 0.0 {
        return Err(SimError::InvalidTimeStep(config.dt));
    }
    if !config.max_time.is_finite() || config.max_time <= 0.0 {
        return Err(SimError::InvalidMaxTime(config.max_time));
    }

    let classification = classify(release.altitude, release.mach, release.target_range);
    let profile = profile_for(classification.mode);
    let mut guidance = GlideGuidance::new(
        classification.mode,
        profile,
        airframe,
        &config.guidance,
        release.target_range,
    );

    let flight = simulate_with(release, airframe, profile, config, &mut guidance);
    let raw_time = flight.final_state.time;

    debug!(
        mode = %guidance.mode(),
        profile = profile.name,
        controller = guidance.name(),
        final_phase = %guidance.phase(),
        steps = flight.steps,
        raw_time,
        distance = flight.final_state.downrange(),
        termination = ?flight.termination,
        "trajectory complete"
    );

    Ok(Trajectory {
        release: *release,
        classification,
        profile,
        flight_time: raw_time * profile.time_scale,
        raw_time,
        terminal_distance: flight.final_state.downrange(),
        termination: flight.termination,
        history: flight.history,
        events: flight.events,
    })
}

/// Run the integration loop with a custom controller.
///
/// Stops when altitude reaches zero or `config.max_time` elapses. The
/// commanded angle of attack is clamped to the profile limit every step.
pub fn simulate_with(
    release: &Release,
    airframe: &Airframe,
    profile: &AeroProfile,
    config: &SimConfig,
    controller: &mut dyn Controller,
) -> Flight {
    let speed = release.mach * atmosphere::sound_speed(release.altitude);
    let mut state = State::at_release(release.altitude, speed);
    let body = BodyModel::new(airframe, profile, &config.guidance);
    let stride = config.sample_stride.max(1);

    let capacity = ((config.max_time / config.dt) as usize / stride as usize).saturating_add(1);
    let mut history = History::with_capacity(capacity.min(100_000));
    let mut events = vec![SimEvent::new(EventKind::Release, &state)];
    let mut steps: u32 = 0;

    while state.altitude() > 0.0 && state.time < config.max_time {
        let cmd = controller.control(&state, config.dt);
        let alpha = profile.clamp_aoa(cmd.alpha);

        state = integrator::step(profile.solver, &state, &body, alpha, config.dt);
        steps += 1;
        state.time = f64::from(steps) * config.dt;

        if cmd.next_phase != cmd.phase {
            events.push(SimEvent::new(
                EventKind::PhaseChange { from: cmd.phase, to: cmd.next_phase },
                &state,
            ));
        }

        if steps % stride == 0 {
            history.push(FlightSample {
                time: state.time,
                distance: state.downrange(),
                altitude: state.altitude(),
                speed: state.speed(),
                phase: cmd.phase,
                flight_path_angle: state.flight_path_angle(),
                aoa: alpha,
            });
        }
    }

    let termination = if state.altitude() <= 0.0 {
        Termination::Impact
    } else {
        Termination::TimeLimit
    };
    let kind = match termination {
        Termination::Impact => EventKind::Impact,
        Termination::TimeLimit => EventKind::TimeLimit,
    };
    events.push(SimEvent::new(kind, &state));

    Flight { final_state: state, steps, history, events, termination }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gnc::GuidanceCommand;
    use crate::vehicle::Solver;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn release_tas(altitude: f64, tas_kmh: f64, range: f64) -> Release {
        Release::new(altitude, tas_kmh / 3.6 / atmosphere::sound_speed(altitude), range)
    }

    /// Unguided drop: zero angle of attack throughout.
    struct Ballistic;

    impl Controller for Ballistic {
        fn control(&mut self, _state: &State, _dt: f64) -> GuidanceCommand {
            GuidanceCommand { alpha: 0.0, phase: Phase::Ballistic, next_phase: Phase::Ballistic }
        }
    }

    #[test]
    fn steep_dive_scenario() {
        let r = release_tas(9000.0, 950.0, 15_000.0);
        let t = simulate(&r, &SimConfig::default()).unwrap();

        assert_eq!(t.mode(), FlightMode::SteepDive);
        assert!((t.classification.glide_ratio - 1.667).abs() < 0.01);
        assert!((t.classification.los_deg + 31.0).abs() < 0.1);
        assert_eq!(t.termination, Termination::Impact);
        assert!(
            t.flight_time > 10.0 && t.flight_time < 100.0,
            "flight time {:.1}s",
            t.flight_time
        );
        assert!(
            (t.terminal_distance - 15_000.0).abs() < 300.0,
            "terminal distance {:.0}m",
            t.terminal_distance
        );
        assert_eq!(
            t.phases(),
            vec![Phase::Release, Phase::Ballistic, Phase::Glide, Phase::Terminal]
        );
    }

    #[test]
    fn max_range_scenario_lofts_before_gliding() {
        let r = release_tas(500.0, 900.0, 20_000.0);
        let t = simulate(&r, &SimConfig::default()).unwrap();

        assert_eq!(t.mode(), FlightMode::MaxRange);
        assert!((t.classification.glide_ratio - 40.0).abs() < 1e-9);
        let phases = t.phases();
        let loft = phases.iter().position(|p| *p == Phase::Loft).expect("loft entered");
        let glide = phases.iter().position(|p| *p == Phase::Glide).expect("glide entered");
        assert!(loft < glide);
        assert_eq!(t.termination, Termination::Impact);
    }

    #[test]
    fn standard_release_uses_legacy_model() {
        let r = release_tas(5000.0, 800.0, 15_000.0);
        let t = simulate(&r, &SimConfig::default()).unwrap();

        assert_eq!(t.mode(), FlightMode::Standard);
        assert_eq!(t.profile.solver, Solver::Euler);
        assert!(
            (t.terminal_distance - 15_000.0).abs() < 300.0,
            "terminal distance {:.0}m",
            t.terminal_distance
        );
    }

    #[test]
    fn simulation_is_deterministic() {
        let r = release_tas(7000.0, 900.0, 25_000.0);
        let a = simulate(&r, &SimConfig::default()).unwrap();
        let b = simulate(&r, &SimConfig::default()).unwrap();
        assert_eq!(a.flight_time, b.flight_time);
        assert_eq!(a.terminal_distance, b.terminal_distance);
        assert_eq!(a.history.as_slice(), b.history.as_slice());
    }

    #[test]
    fn flight_time_is_scaled_by_profile() {
        let r = release_tas(9000.0, 950.0, 15_000.0);
        let t = simulate(&r, &SimConfig::default()).unwrap();
        assert!((t.flight_time - t.raw_time * t.profile.time_scale).abs() < 1e-12);
        assert!(t.flight_time > t.raw_time);
    }

    #[test]
    fn time_ceiling_is_a_normal_termination() {
        let config = SimConfig { max_time: 5.0, ..SimConfig::default() };
        let r = release_tas(9000.0, 950.0, 15_000.0);
        let t = simulate(&r, &config).unwrap();

        assert_eq!(t.termination, Termination::TimeLimit);
        assert!((t.raw_time - 5.0).abs() < 0.051);
        assert_eq!(t.history.len(), 10);
        assert_eq!(t.events.last().unwrap().kind, EventKind::TimeLimit);
    }

    #[test]
    fn history_is_sampled_every_tenth_step() {
        let r = release_tas(9000.0, 950.0, 15_000.0);
        let t = simulate(&r, &SimConfig::default()).unwrap();
        let first = &t.history.as_slice()[0];
        assert!((first.time - 0.5).abs() < 1e-9);
        for pair in t.history.as_slice().windows(2) {
            assert!((pair[1].time - pair[0].time - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn release_at_ground_level_ends_immediately() {
        let t = simulate(&Release::new(0.0, 0.8, 10_000.0), &SimConfig::default()).unwrap();
        assert_eq!(t.termination, Termination::Impact);
        assert_eq!(t.raw_time, 0.0);
        assert!(t.history.is_empty());
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let config = SimConfig::default();
        assert!(matches!(
            simulate(&Release::new(f64::NAN, 0.8, 10_000.0), &config),
            Err(SimError::NonFiniteAltitude(_))
        ));
        assert!(matches!(
            simulate(&Release::new(5000.0, -0.1, 10_000.0), &config),
            Err(SimError::InvalidMach(_))
        ));
        assert_eq!(
            simulate(&Release::new(5000.0, 0.8, 0.0), &config).unwrap_err(),
            SimError::InvalidRange(0.0)
        );
        let bad_dt = SimConfig { dt: 0.0, ..SimConfig::default() };
        assert_eq!(
            simulate(&Release::new(5000.0, 0.8, 10_000.0), &bad_dt).unwrap_err(),
            SimError::InvalidTimeStep(0.0)
        );
    }

    #[test]
    fn time_ceiling_must_be_finite_and_positive() {
        let r = Release::new(5000.0, 0.8, 10_000.0);
        for bad in [f64::INFINITY, -1.0, 0.0] {
            let config = SimConfig { max_time: bad, sample_stride: 1, ..SimConfig::default() };
            assert_eq!(simulate(&r, &config).unwrap_err(), SimError::InvalidMaxTime(bad));
        }
        let config = SimConfig { max_time: f64::NAN, ..SimConfig::default() };
        assert!(matches!(simulate(&r, &config), Err(SimError::InvalidMaxTime(_))));
    }

    #[test]
    fn unvalidated_loop_survives_huge_time_ceiling() {
        let r = release_tas(500.0, 900.0, 20_000.0);
        let config = SimConfig { max_time: f64::INFINITY, sample_stride: 1, ..SimConfig::default() };
        let profile = profile_for(FlightMode::MaxRange);
        let flight = simulate_with(&r, &presets::gbu62(), profile, &config, &mut Ballistic);
        assert_eq!(flight.termination, Termination::Impact);
        assert_eq!(flight.history.len() as u32, flight.steps);
    }

    #[test]
    fn custom_controller_drives_the_loop() {
        let r = release_tas(500.0, 900.0, 20_000.0);
        let profile = profile_for(FlightMode::MaxRange);
        let drop = simulate_with(&r, &presets::gbu62(), profile, &SimConfig::default(), &mut Ballistic);
        let guided = simulate(&r, &SimConfig::default()).unwrap();

        assert_eq!(drop.termination, Termination::Impact);
        assert!(drop.history.iter().all(|s| s.aoa == 0.0));
        assert!(drop.final_state.downrange() < guided.terminal_distance);
    }

    #[test]
    fn integration_always_terminates_within_limits() {
        let mut rng = StdRng::seed_from_u64(0x9b0);
        let config = SimConfig::default();
        for _ in 0..25 {
            let altitude = rng.random_range(1.0..20_000.0);
            let mach = rng.random_range(0.05..3.0);
            let range = rng.random_range(500.0..80_000.0);
            let t = simulate(&Release::new(altitude, mach, range), &config).unwrap();

            match t.termination {
                Termination::Impact => {
                    assert!(t.events.last().unwrap().state.altitude() <= 0.0)
                }
                Termination::TimeLimit => assert!(t.raw_time >= config.max_time - 1e-9),
            }
            assert!(t.raw_time <= config.max_time + config.dt);
            assert!(t.flight_time.is_finite() && t.terminal_distance.is_finite());

            for s in &t.history {
                assert!(
                    s.aoa.abs() <= t.profile.max_aoa,
                    "aoa {} beyond {} in {:?} (alt={altitude} mach={mach} range={range})",
                    s.aoa,
                    t.profile.max_aoa,
                    s.phase
                );
            }
        }
    }
}
