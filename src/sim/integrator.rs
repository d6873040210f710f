use nalgebra::Vector2;

use crate::dynamics::{self, state::G0, BodyModel};
use crate::dynamics::state::State;
use crate::physics::aerodynamics::dynamic_pressure;
use crate::physics::{atmosphere, gravity};
use crate::vehicle::Solver;

/// Speed floor of the polar Euler step, m/s.
pub const EULER_MIN_SPEED: f64 = 10.0;

// ---------------------------------------------------------------------------
// Classical 4th-order Runge-Kutta (Cartesian)
// ---------------------------------------------------------------------------

/// Single RK4 step with constant angle of attack over the step.
pub fn rk4_step(state: &State, body: &BodyModel, alpha: f64, dt: f64) -> State {
    let k1 = dynamics::derivatives(state, body, alpha);
    let k2 = dynamics::derivatives(&state.apply(&k1, dt * 0.5), body, alpha);
    let k3 = dynamics::derivatives(&state.apply(&k2, dt * 0.5), body, alpha);
    let k4 = dynamics::derivatives(&state.apply(&k3, dt), body, alpha);

    State {
        time: state.time + dt,
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
    }
}

// ---------------------------------------------------------------------------
// Legacy polar Euler step
// ---------------------------------------------------------------------------

/// Single Euler step on speed and flight-path angle.
///
/// Tangential acceleration: drag + gravity along the path.
/// Normal acceleration: lift + gravity across the path, clamped to the
/// load-factor limit, then turned into a path-angle rate.
pub fn euler_step(state: &State, body: &BodyModel, alpha: f64, dt: f64) -> State {
    let alt = state.altitude();
    let speed = state.speed();
    let gamma = state.flight_path_angle();

    let q = dynamic_pressure(atmosphere::air_density(alt), speed);
    let mach = speed / atmosphere::sound_speed(alt);
    let alpha = alpha.clamp(-body.max_aoa, body.max_aoa);
    let forces = body.aero.forces(q, mach, alpha, body.area);

    let weight = gravity::weight(body.mass);
    let a_tan = (-forces.drag - weight * gamma.sin()) / body.mass;
    let max_normal = body.g_limit * G0;
    let a_norm = ((forces.lift - weight * gamma.cos()) / body.mass).clamp(-max_normal, max_normal);

    let speed_new = (speed + a_tan * dt).max(EULER_MIN_SPEED);
    let omega = if speed > 1.0 { a_norm / speed } else { 0.0 };
    let gamma_new = gamma + omega * dt;

    let vel = Vector2::new(gamma_new.cos(), gamma_new.sin()) * speed_new;
    State {
        time: state.time + dt,
        pos: state.pos + vel * dt,
        vel,
    }
}

/// Advance one step with the profile's solver.
pub fn step(solver: Solver, state: &State, body: &BodyModel, alpha: f64, dt: f64) -> State {
    match solver {
        Solver::Rk4 => rk4_step(state, body, alpha, dt),
        Solver::Euler => euler_step(state, body, alpha, dt),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
