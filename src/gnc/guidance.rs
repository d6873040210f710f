use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dynamics::state::{GuidanceConfig, State, G0};
use crate::physics::aerodynamics::dynamic_pressure;
use crate::physics::atmosphere;
use crate::vehicle::{AeroProfile, Airframe};

use super::controller::{Controller, GuidanceCommand};
use super::mode::FlightMode;

// ---------------------------------------------------------------------------
// Guidance phases
// ---------------------------------------------------------------------------

/// One-directional phase sequence: RELEASE, BALLISTIC, (LOFT), GLIDE, TERMINAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Release,
    Ballistic,
    Loft,
    Glide,
    Terminal,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Release => "RELEASE",
            Phase::Ballistic => "BALLISTIC",
            Phase::Loft => "LOFT",
            Phase::Glide => "GLIDE",
            Phase::Terminal => "TERMINAL",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Per-step guidance inputs
// ---------------------------------------------------------------------------

/// Quantities the guidance law reads each step, derived from the state.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    pub time: f64,         // s since release
    pub altitude: f64,     // m
    pub distance_to_go: f64, // m of ground range left to the target
    pub speed: f64,        // m/s
    pub gamma: f64,        // flight-path angle, rad
    pub mach: f64,
    pub q: f64,            // dynamic pressure, Pa
}

impl StepContext {
    pub fn new(state: &State, target_range: f64) -> Self {
        let altitude = state.altitude();
        let speed = state.speed();
        Self {
            time: state.time,
            altitude,
            distance_to_go: target_range - state.downrange(),
            speed,
            gamma: state.flight_path_angle(),
            mach: speed / atmosphere::sound_speed(altitude),
            q: dynamic_pressure(atmosphere::air_density(altitude), speed),
        }
    }

    /// Current line-of-sight angle to the target, rad.
    pub fn line_of_sight(&self) -> f64 {
        (-self.altitude).atan2(self.distance_to_go)
    }
}

/// Result of evaluating the active phase once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseStep {
    pub next: Phase,
    pub alpha: f64,          // unclamped command, rad
    pub los: Option<f64>,    // LOS sample to remember for the next rate estimate
}

// ---------------------------------------------------------------------------
// Glide bomb guidance law
// ---------------------------------------------------------------------------

/// Multi-phase guidance: ballistic fall, optional loft, scheduled glide,
/// proportional-navigation terminal homing.
#[derive(Debug, Clone)]
pub struct GlideGuidance {
    mode: FlightMode,
    profile: AeroProfile,
    config: GuidanceConfig,
    mass: f64,
    area: f64,
    target_range: f64,
    phase: Phase,
    prev_los: Option<f64>,
}

impl GlideGuidance {
    pub fn new(
        mode: FlightMode,
        profile: &AeroProfile,
        airframe: &Airframe,
        config: &GuidanceConfig,
        target_range: f64,
    ) -> Self {
        Self {
            mode,
            profile: *profile,
            config: config.clone(),
            mass: airframe.mass,
            area: airframe.reference_area(),
            target_range,
            phase: Phase::Release,
            prev_los: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> FlightMode {
        self.mode
    }

    /// Evaluate the active phase once. Pure: the returned transition is
    /// committed by `control` and only takes effect on the following step.
    pub fn evaluate(&self, ctx: &StepContext, dt: f64) -> PhaseStep {
        match self.phase {
            Phase::Release => PhaseStep { next: Phase::Ballistic, alpha: 0.0, los: None },
            Phase::Ballistic => {
                let next = if ctx.time < self.config.ballistic_duration {
                    Phase::Ballistic
                } else if self.mode.skips_loft() {
                    Phase::Glide
                } else {
                    Phase::Loft
                };
                PhaseStep { next, alpha: 0.0, los: None }
            }
            Phase::Loft => self.loft(ctx),
            Phase::Glide => self.glide(ctx),
            Phase::Terminal => self.terminal(ctx, dt),
        }
    }

    /// P-control on flight-path angle toward the loft elevation.
    fn loft(&self, ctx: &StepContext) -> PhaseStep {
        let gamma_deg = ctx.gamma.to_degrees();
        let error = self.profile.loft_elevation - gamma_deg;
        let accel_cmd = error * self.profile.loft_gain * G0;
        let alpha = self.profile.model.alpha_for_lift(self.mass * accel_cmd, ctx.q, self.area);

        let next = if gamma_deg > self.profile.loft_elevation || ctx.time > self.config.loft_timeout {
            Phase::Glide
        } else {
            Phase::Loft
        };
        PhaseStep { next, alpha, los: None }
    }

    /// Track the scheduled pitch, G-limited.
    fn glide(&self, ctx: &StepContext) -> PhaseStep {
        let target_pitch = self.profile.pitch_schedule.target_pitch(ctx.mach).to_radians();
        let alpha = self.profile.clamp_aoa(target_pitch - ctx.gamma);
        let max_lift = self.config.g_limit * self.mass * G0;
        let alpha = self.profile.model.limit_alpha_for_load(alpha, ctx.q, self.area, max_lift);

        let los = ctx.line_of_sight();
        let next = if los < self.profile.terminal_los.to_radians()
            || ctx.distance_to_go < self.config.terminal_distance
        {
            Phase::Terminal
        } else {
            Phase::Glide
        };
        PhaseStep { next, alpha, los: None }
    }

    /// Proportional navigation with gravity compensation.
    fn terminal(&self, ctx: &StepContext, dt: f64) -> PhaseStep {
        let los = ctx.line_of_sight();
        // First terminal step: no previous sample, zero rate
        let prev = self.prev_los.unwrap_or(los);
        let los_rate = (los - prev) / dt;

        let accel_cmd = self.config.nav_constant * ctx.speed * los_rate;
        let lift_needed = self.mass * (accel_cmd + G0 * ctx.gamma.cos());
        let alpha = self.profile.model.alpha_for_lift(lift_needed, ctx.q, self.area);

        PhaseStep { next: Phase::Terminal, alpha, los: Some(los) }
    }
}

impl Controller for GlideGuidance {
    fn control(&mut self, state: &State, dt: f64) -> GuidanceCommand {
        let ctx = StepContext::new(state, self.target_range);
        let step = self.evaluate(&ctx, dt);

        let cmd = GuidanceCommand {
            alpha: self.profile.clamp_aoa(step.alpha),
            phase: self.phase,
            next_phase: step.next,
        };
        if step.los.is_some() {
            self.prev_los = step.los;
        }
        self.phase = step.next;
        cmd
    }

    fn reset(&mut self) {
        self.phase = Phase::Release;
        self.prev_los = None;
    }

    fn name(&self) -> &str {
        "GlideGuidance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gnc::mode::classify;
    use crate::vehicle::{presets, profile_for};
    use nalgebra::Vector2;

    fn guidance(mode: FlightMode, target_range: f64) -> GlideGuidance {
        GlideGuidance::new(
            mode,
            profile_for(mode),
            &presets::gbu62(),
            &GuidanceConfig::default(),
            target_range,
        )
    }

    fn state(time: f64, x: f64, alt: f64, vx: f64, vy: f64) -> State {
        State {
            time,
            pos: Vector2::new(x, alt),
            vel: Vector2::new(vx, vy),
        }
    }

    #[test]
    fn release_advances_to_ballistic_with_zero_alpha() {
        let mut g = guidance(FlightMode::SteepDive, 15_000.0);
        let cmd = g.control(&state(0.0, 0.0, 9000.0, 264.0, 0.0), 0.05);
        assert_eq!(cmd.phase, Phase::Release);
        assert_eq!(cmd.next_phase, Phase::Ballistic);
        assert_eq!(cmd.alpha, 0.0);
        assert_eq!(g.phase(), Phase::Ballistic);
    }

    #[test]
    fn ballistic_holds_until_duration_expires() {
        let mut g = guidance(FlightMode::MaxRange, 20_000.0);
        g.phase = Phase::Ballistic;
        let cmd = g.control(&state(2.45, 600.0, 480.0, 250.0, -20.0), 0.05);
        assert_eq!(cmd.next_phase, Phase::Ballistic);
        assert_eq!(cmd.alpha, 0.0);

        let cmd = g.control(&state(2.5, 612.0, 479.0, 250.0, -20.0), 0.05);
        assert_eq!(cmd.next_phase, Phase::Loft);
    }

    #[test]
    fn steep_dive_skips_loft() {
        let mut g = guidance(FlightMode::SteepDive, 15_000.0);
        g.phase = Phase::Ballistic;
        let cmd = g.control(&state(2.5, 650.0, 8970.0, 262.0, -24.0), 0.05);
        assert_eq!(cmd.next_phase, Phase::Glide);
    }

    #[test]
    fn loft_pulls_up_and_exits_above_elevation() {
        let mut g = guidance(FlightMode::MaxRange, 20_000.0);
        g.phase = Phase::Loft;
        let cmd = g.control(&state(3.0, 700.0, 470.0, 250.0, -10.0), 0.05);
        assert!(cmd.alpha > 0.0);
        assert_eq!(cmd.next_phase, Phase::Loft);

        // Climbing at ~40 deg, above the 35 deg loft target
        let cmd = g.control(&state(6.0, 1400.0, 700.0, 150.0, 126.0), 0.05);
        assert_eq!(cmd.next_phase, Phase::Glide);
    }

    #[test]
    fn loft_times_out() {
        let mut g = guidance(FlightMode::MaxRange, 20_000.0);
        g.phase = Phase::Loft;
        let cmd = g.control(&state(10.05, 2000.0, 900.0, 200.0, 20.0), 0.05);
        assert_eq!(cmd.next_phase, Phase::Glide);
    }

    #[test]
    fn glide_respects_g_limit() {
        let g = GlideGuidance {
            phase: Phase::Glide,
            ..guidance(FlightMode::MaxRange, 60_000.0)
        };
        // Fast, low, diving steeply: a large pitch-up demand
        let ctx = StepContext::new(&state(20.0, 5000.0, 1500.0, 250.0, -250.0), 60_000.0);
        let step = g.evaluate(&ctx, 0.05);
        let lift = g.profile.model.forces(ctx.q, ctx.mach, step.alpha, g.area).lift;
        let max_lift = 2.75 * g.mass * G0;
        assert!(step.alpha > 0.0);
        assert!(lift <= max_lift + 1e-6, "lift {} > {}", lift, max_lift);
    }

    #[test]
    fn glide_enters_terminal_inside_terminal_distance() {
        let mut g = guidance(FlightMode::MaxRange, 20_000.0);
        g.phase = Phase::Glide;
        let cmd = g.control(&state(60.0, 18_500.0, 300.0, 200.0, -5.0), 0.05);
        assert_eq!(cmd.phase, Phase::Glide);
        assert_eq!(cmd.next_phase, Phase::Terminal);
        // The transition does not change this step's law
        assert_eq!(g.phase(), Phase::Terminal);
    }

    #[test]
    fn terminal_first_step_has_no_rate_spike() {
        let mut g = guidance(FlightMode::SteepDive, 15_000.0);
        g.phase = Phase::Terminal;
        let s = state(30.0, 9_000.0, 4000.0, 150.0, -120.0);
        let cmd = g.control(&s, 0.05);

        let ctx = StepContext::new(&s, 15_000.0);
        let gravity_only = g
            .profile
            .model
            .alpha_for_lift(g.mass * G0 * ctx.gamma.cos(), ctx.q, g.area);
        assert!((cmd.alpha - g.profile.clamp_aoa(gravity_only)).abs() < 1e-12);
        assert_eq!(g.prev_los, Some(ctx.line_of_sight()));
    }

    #[test]
    fn terminal_pitches_down_when_los_steepens() {
        let mut g = guidance(FlightMode::SteepDive, 15_000.0);
        g.phase = Phase::Terminal;
        let s = state(30.0, 9_000.0, 4000.0, 150.0, -120.0);
        let level = g.control(&s, 0.05).alpha;
        // Seed with a shallower LOS so the rate is negative
        g.prev_los = Some(StepContext::new(&s, 15_000.0).line_of_sight() + 0.01);
        let steeper = g.control(&s, 0.05).alpha;
        assert!(steeper < level);
    }

    #[test]
    fn commanded_alpha_never_exceeds_profile_limit() {
        let c = classify(500.0, 0.74, 20_000.0);
        let mut g = guidance(c.mode, 20_000.0);
        g.phase = Phase::Loft;
        // Very slow: the lift inversion asks for far more than the fins allow
        let cmd = g.control(&state(3.0, 100.0, 400.0, 40.0, -5.0), 0.05);
        assert_eq!(cmd.alpha, profile_for(c.mode).max_aoa);
    }

    #[test]
    fn reset_returns_to_release() {
        let mut g = guidance(FlightMode::Standard, 15_000.0);
        g.phase = Phase::Terminal;
        g.prev_los = Some(-0.5);
        g.reset();
        assert_eq!(g.phase(), Phase::Release);
        assert!(g.prev_los.is_none());
    }
}
