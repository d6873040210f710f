use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.81; // gravity used by the flight model, m/s^2

// ---------------------------------------------------------------------------
// Planar state: downrange distance, altitude and their rates
// ---------------------------------------------------------------------------

/// Integration state. Frame: x downrange from the release point, y up.
#[derive(Debug, Clone)]
pub struct State {
    pub time: f64,              // s since release
    pub pos: Vector2<f64>,      // m   [downrange, altitude]
    pub vel: Vector2<f64>,      // m/s
}

impl State {
    /// Level release at `speed` m/s from `altitude` m.
    pub fn at_release(altitude: f64, speed: f64) -> State {
        State {
            time: 0.0,
            pos: Vector2::new(0.0, altitude),
            vel: Vector2::new(speed, 0.0),
        }
    }

    /// Advance state by a derivative scaled by dt (used inside RK4).
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
        }
    }

    pub fn downrange(&self) -> f64 {
        self.pos.x
    }

    pub fn altitude(&self) -> f64 {
        self.pos.y
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Flight-path angle (rad). Positive = climbing.
    pub fn flight_path_angle(&self) -> f64 {
        self.vel.y.atan2(self.vel.x)
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Deriv {
    pub dpos: Vector2<f64>,   // velocity
    pub dvel: Vector2<f64>,   // acceleration
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,              // integration timestep, s
    pub max_time: f64,        // hard stop, s
    pub sample_stride: u32,   // history keeps every Nth step
    pub guidance: GuidanceConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.05,         // 20 Hz
            max_time: 600.0,  // 10 min ceiling
            sample_stride: 10,
            guidance: GuidanceConfig::default(),
        }
    }
}

/// Phase timing and limits shared by every profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub ballistic_duration: f64, // s of unguided fall after release
    pub loft_timeout: f64,       // s since release after which loft is abandoned
    pub terminal_distance: f64,  // m to go that forces terminal homing
    pub g_limit: f64,            // max load factor during glide (and legacy normal accel)
    pub nav_constant: f64,       // proportional navigation gain N
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            ballistic_duration: 2.5,
            loft_timeout: 10.0,
            terminal_distance: 2000.0,
            g_limit: 2.75,
            nav_constant: 4.0,
        }
    }
}
