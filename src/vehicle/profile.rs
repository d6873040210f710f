use serde::Serialize;

use crate::gnc::FlightMode;
use crate::physics::aerodynamics::AeroModel;

// ---------------------------------------------------------------------------
// Aerodynamic / guidance profiles
// ---------------------------------------------------------------------------

/// Which step function integrates a trajectory bound to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Solver {
    /// Cartesian 4th-order Runge-Kutta.
    Rk4,
    /// Polar Euler step of the historical low-fidelity model.
    Euler,
}

/// Glide target pitch as a function of Mach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PitchSchedule {
    /// Constant pitch regardless of speed.
    Fixed { pitch_deg: f64 },
    /// Linear between two pitch values across a Mach band, held outside it.
    Mach {
        mach_low: f64,
        mach_high: f64,
        pitch_low_deg: f64,
        pitch_high_deg: f64,
    },
}

impl PitchSchedule {
    /// Target pitch in degrees at the given Mach number.
    pub fn target_pitch(&self, mach: f64) -> f64 {
        match *self {
            PitchSchedule::Fixed { pitch_deg } => pitch_deg,
            PitchSchedule::Mach { mach_low, mach_high, pitch_low_deg, pitch_high_deg } => {
                if mach <= mach_low {
                    pitch_low_deg
                } else if mach >= mach_high {
                    pitch_high_deg
                } else {
                    let ratio = (mach - mach_low) / (mach_high - mach_low);
                    pitch_low_deg + ratio * (pitch_high_deg - pitch_low_deg)
                }
            }
        }
    }
}

/// Immutable coefficient bundle bound to one trajectory for its whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AeroProfile {
    pub name: &'static str,
    pub model: AeroModel,
    pub max_aoa: f64,            // rad
    pub pitch_schedule: PitchSchedule,
    pub loft_elevation: f64,     // deg, target flight-path angle while lofting
    pub loft_gain: f64,          // g per degree of elevation error
    pub terminal_los: f64,       // deg, LOS below this starts terminal homing
    pub solver: Solver,
    pub time_scale: f64,         // empirical flight-time calibration
}

impl AeroProfile {
    /// Clamp a commanded angle of attack to the profile limit.
    pub fn clamp_aoa(&self, alpha: f64) -> f64 {
        alpha.clamp(-self.max_aoa, self.max_aoa)
    }
}

// ---------------------------------------------------------------------------
// Profile table
// ---------------------------------------------------------------------------

/// v1.5 low-fidelity flight model (sine lift, polar Euler, 22 deg fin limit).
pub const LEGACY_V15: AeroProfile = AeroProfile {
    name: "legacy-v1.5",
    model: AeroModel::Legacy {
        planform_mult: 3.5,
        cx0: 0.0257,
        cx_k: 1.075,
    },
    max_aoa: 0.386,
    pitch_schedule: PitchSchedule::Mach {
        mach_low: 0.6,
        mach_high: 0.8,
        pitch_low_deg: 6.0,
        pitch_high_deg: 13.0,
    },
    loft_elevation: 5.0,
    loft_gain: 0.85,
    terminal_los: -50.0,
    solver: Solver::Euler,
    time_scale: 1.03,
};

/// v1.9.5 long glide: low drag, high time scale.
pub const MAX_RANGE_V195: AeroProfile = AeroProfile {
    name: "max-range-v1.9.5",
    model: AeroModel::Linear {
        cd0: 0.036,
        k_induced: 0.015,
        cl_alpha: 1.5,
        drag_mult: 0.553,
        lift_mult: 0.839,
        planform_mult: 5.7262,
    },
    max_aoa: 0.5,
    pitch_schedule: PitchSchedule::Mach {
        mach_low: 0.6,
        mach_high: 0.95,
        pitch_low_deg: 11.49,
        pitch_high_deg: 8.25,
    },
    loft_elevation: 35.0,
    loft_gain: 0.5,
    terminal_los: -19.04,
    solver: Solver::Rk4,
    time_scale: 1.349,
};

/// v1.9.5 steep dive: high drag, fixed dive pitch.
pub const STEEP_DIVE_V195: AeroProfile = AeroProfile {
    name: "steep-dive-v1.9.5",
    model: AeroModel::Linear {
        cd0: 0.036,
        k_induced: 0.015,
        cl_alpha: 1.5,
        drag_mult: 4.471,
        lift_mult: 0.868,
        planform_mult: 5.7262,
    },
    max_aoa: 0.5,
    pitch_schedule: PitchSchedule::Fixed { pitch_deg: 15.68 },
    loft_elevation: 35.0,
    loft_gain: 0.5,
    terminal_los: -19.04,
    solver: Solver::Rk4,
    time_scale: 1.05,
};

/// Profile bound to a trajectory of the given flight mode.
pub fn profile_for(mode: FlightMode) -> &'static AeroProfile {
    match mode {
        FlightMode::Standard => &LEGACY_V15,
        FlightMode::MaxRange => &MAX_RANGE_V195,
        FlightMode::SteepDive => &STEEP_DIVE_V195,
    }
}
