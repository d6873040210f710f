pub mod state;

use crate::physics::aerodynamics::{self, dynamic_pressure, AeroModel};
use crate::physics::{atmosphere, gravity};
use crate::vehicle::{AeroProfile, Airframe};
use state::{Deriv, GuidanceConfig, State};

// ---------------------------------------------------------------------------
// Body model: what the equations of motion need from airframe + profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct BodyModel {
    pub mass: f64,     // kg
    pub area: f64,     // reference area, m^2
    pub aero: AeroModel,
    pub max_aoa: f64,  // rad
    pub g_limit: f64,  // load factor clamp used by the polar Euler step
}

impl BodyModel {
    pub fn new(airframe: &Airframe, profile: &AeroProfile, guidance: &GuidanceConfig) -> Self {
        Self {
            mass: airframe.mass,
            area: airframe.reference_area(),
            aero: profile.model,
            max_aoa: profile.max_aoa,
            g_limit: guidance.g_limit,
        }
    }
}

// ---------------------------------------------------------------------------
// Equations of motion (planar point mass)
// ---------------------------------------------------------------------------

/// Compute state derivatives for a given state, body and angle of attack.
///
/// Forces modeled:
///   1. Gravity: uniform, down
///   2. Drag: opposing velocity, with transonic wave-drag rise
///   3. Lift: perpendicular to velocity, from the clamped angle of attack
pub fn derivatives(state: &State, body: &BodyModel, alpha: f64) -> Deriv {
    let alt = state.altitude();
    // Floor avoids a degenerate direction at rest
    let speed = state.speed().max(1.0);
    let gamma = state.flight_path_angle();

    let q = dynamic_pressure(atmosphere::air_density(alt), speed);
    let mach = speed / atmosphere::sound_speed(alt);
    let alpha = alpha.clamp(-body.max_aoa, body.max_aoa);

    let forces = body.aero.forces(q, mach, alpha, body.area);
    let a_aero = aerodynamics::resolve(&forces, gamma) / body.mass;

    Deriv {
        dpos: state.vel,
        dvel: a_aero + gravity::gravity_accel(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
