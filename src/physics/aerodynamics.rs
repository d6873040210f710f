use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::Vector2;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Transonic wave-drag rise
// ---------------------------------------------------------------------------

pub const MACH_CRITICAL: f64 = 1.289;
pub const MACH_PEAK: f64 = 1.6;
pub const DRAG_RISE: f64 = 3.2; // added multiple of zero-lift drag at peak

/// Zero-lift drag multiplier vs Mach.
///
/// 1.0 below the critical Mach, a squared-sine ramp up to `1 + DRAG_RISE`
/// at the peak Mach, constant above. Continuous at both breakpoints.
pub fn wave_drag_multiplier(mach: f64) -> f64 {
    if mach < MACH_CRITICAL {
        1.0
    } else if mach < MACH_PEAK {
        let ratio = (mach - MACH_CRITICAL) / (MACH_PEAK - MACH_CRITICAL);
        1.0 + DRAG_RISE * (ratio * FRAC_PI_2).sin().powi(2)
    } else {
        1.0 + DRAG_RISE
    }
}

/// q = 0.5 * rho * v^2
pub fn dynamic_pressure(density: f64, speed: f64) -> f64 {
    0.5 * density * speed * speed
}

// ---------------------------------------------------------------------------
// Aerodynamic coefficient models
// ---------------------------------------------------------------------------

/// Lift/drag coefficient model bound to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AeroModel {
    /// Linear lift curve, parabolic induced drag, transonic wave-drag rise.
    Linear {
        cd0: f64,           // zero-lift drag coefficient
        k_induced: f64,     // induced drag factor
        cl_alpha: f64,      // lift-curve slope, 1/rad
        drag_mult: f64,
        lift_mult: f64,
        planform_mult: f64, // effective area / reference area
    },
    /// Sine lift law of the low-fidelity historical model. No wave drag.
    Legacy {
        planform_mult: f64,
        cx0: f64,
        cx_k: f64,
    },
}

/// Force magnitudes; drag acts against velocity, lift perpendicular to it.
#[derive(Debug, Clone, Copy)]
pub struct AeroForces {
    pub drag: f64, // N
    pub lift: f64, // N
}

impl AeroModel {
    /// Lift coefficient at a given angle of attack (rad).
    pub fn lift_coefficient(&self, alpha: f64) -> f64 {
        match *self {
            AeroModel::Linear { cl_alpha, .. } => cl_alpha * alpha,
            AeroModel::Legacy { planform_mult, .. } => planform_mult * TAU * alpha.sin(),
        }
    }

    /// Drag and lift for dynamic pressure `q`, Mach and angle of attack.
    /// `alpha` must already be limited to the profile maximum.
    pub fn forces(&self, q: f64, mach: f64, alpha: f64, area: f64) -> AeroForces {
        let cl = self.lift_coefficient(alpha);
        match *self {
            AeroModel::Linear { cd0, k_induced, drag_mult, lift_mult, planform_mult, .. } => {
                let cd = cd0 * wave_drag_multiplier(mach) + k_induced * cl * cl;
                let s = area * planform_mult;
                AeroForces {
                    drag: q * s * cd * drag_mult,
                    lift: q * s * cl * lift_mult,
                }
            }
            AeroModel::Legacy { planform_mult, cx0, cx_k } => {
                let cd = cx0 + cx_k * planform_mult * alpha.sin().powi(2);
                AeroForces {
                    drag: q * area * planform_mult * cd,
                    lift: q * area * cl,
                }
            }
        }
    }

    /// Lift force produced per unit of lift coefficient.
    pub fn lift_per_unit_cl(&self, q: f64, area: f64) -> f64 {
        match *self {
            AeroModel::Linear { lift_mult, planform_mult, .. } => q * area * planform_mult * lift_mult,
            AeroModel::Legacy { .. } => q * area,
        }
    }

    /// Inverse of `lift_coefficient`.
    pub fn alpha_for_cl(&self, cl: f64) -> f64 {
        match *self {
            AeroModel::Linear { cl_alpha, .. } => cl / cl_alpha,
            AeroModel::Legacy { planform_mult, .. } => {
                (cl / (planform_mult * TAU)).clamp(-1.0, 1.0).asin()
            }
        }
    }

    /// Angle of attack needed to produce `lift` newtons at dynamic pressure `q`.
    /// Zero when there is no dynamic pressure to work with.
    pub fn alpha_for_lift(&self, lift: f64, q: f64, area: f64) -> f64 {
        let per_cl = self.lift_per_unit_cl(q, area);
        if per_cl <= 1e-9 {
            return 0.0;
        }
        self.alpha_for_cl(lift / per_cl)
    }

    /// G-limiter: reduce `alpha` until the lift it produces stays within `max_lift`.
    pub fn limit_alpha_for_load(&self, alpha: f64, q: f64, area: f64, max_lift: f64) -> f64 {
        let per_cl = self.lift_per_unit_cl(q, area);
        let lift = per_cl * self.lift_coefficient(alpha);
        if per_cl <= 1e-9 || lift.abs() <= max_lift {
            return alpha;
        }
        self.alpha_for_cl(max_lift / per_cl).abs().copysign(alpha)
    }
}

/// Resolve drag and lift into the ground frame (x downrange, y up) for
/// flight-path angle `gamma`.
pub fn resolve(forces: &AeroForces, gamma: f64) -> Vector2<f64> {
    let (sin_g, cos_g) = gamma.sin_cos();
    Vector2::new(
        -forces.drag * cos_g - forces.lift * sin_g,
        -forces.drag * sin_g + forces.lift * cos_g,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR: AeroModel = AeroModel::Linear {
        cd0: 0.036,
        k_induced: 0.015,
        cl_alpha: 1.5,
        drag_mult: 1.0,
        lift_mult: 1.0,
        planform_mult: 5.7262,
    };

    const LEGACY: AeroModel = AeroModel::Legacy {
        planform_mult: 3.5,
        cx0: 0.0257,
        cx_k: 1.075,
    };

    #[test]
    fn wave_drag_is_flat_below_critical() {
        assert_eq!(wave_drag_multiplier(0.5), 1.0);
        assert_eq!(wave_drag_multiplier(1.28), 1.0);
    }

    #[test]
    fn wave_drag_ramp_is_continuous() {
        assert!((wave_drag_multiplier(MACH_CRITICAL) - 1.0).abs() < 1e-12);
        let just_below_peak = wave_drag_multiplier(MACH_PEAK - 1e-9);
        assert!((just_below_peak - (1.0 + DRAG_RISE)).abs() < 1e-6);
        assert_eq!(wave_drag_multiplier(2.5), 1.0 + DRAG_RISE);

        let mid = wave_drag_multiplier(0.5 * (MACH_CRITICAL + MACH_PEAK));
        assert!((mid - (1.0 + 0.5 * DRAG_RISE)).abs() < 1e-9);
    }

    #[test]
    fn drag_opposes_velocity() {
        let f = LINEAR.forces(20_000.0, 0.8, 0.0, 0.0585);
        // Level flight to the right: drag points left, no lift
        let v = resolve(&f, 0.0);
        assert!(v.x < 0.0);
        assert!(v.y.abs() < 1e-9);

        // Vertical dive: drag points up
        let v = resolve(&f, -FRAC_PI_2);
        assert!(v.y > 0.0);
        assert!(v.x.abs() < 1e-6);
    }

    #[test]
    fn lift_is_perpendicular_to_velocity() {
        let f = LINEAR.forces(20_000.0, 0.8, 0.1, 0.0585);
        let gamma = -0.3_f64;
        let total = resolve(&f, gamma);
        let drag_only = resolve(&AeroForces { drag: f.drag, lift: 0.0 }, gamma);
        let lift_vec = total - drag_only;
        let vel_dir = Vector2::new(gamma.cos(), gamma.sin());
        assert!(lift_vec.dot(&vel_dir).abs() < 1e-6);
        assert!((lift_vec.norm() - f.lift).abs() < 1e-6);
    }

    #[test]
    fn wave_drag_only_affects_linear_model() {
        let sub = LINEAR.forces(10_000.0, 0.9, 0.0, 0.0585);
        let sup = LINEAR.forces(10_000.0, 1.7, 0.0, 0.0585);
        assert!((sup.drag / sub.drag - (1.0 + DRAG_RISE)).abs() < 1e-9);

        let sub = LEGACY.forces(10_000.0, 0.9, 0.0, 0.0585);
        let sup = LEGACY.forces(10_000.0, 1.7, 0.0, 0.0585);
        assert_eq!(sub.drag, sup.drag);
    }

    #[test]
    fn lift_inversion_recovers_alpha() {
        for model in [LINEAR, LEGACY] {
            let q = 35_000.0;
            let alpha = 0.12;
            let lift = model.forces(q, 0.7, alpha, 0.0585).lift;
            let back = model.alpha_for_lift(lift, q, 0.0585);
            assert!((back - alpha).abs() < 1e-9, "{:?}: {} vs {}", model, back, alpha);
        }
    }

    #[test]
    fn no_dynamic_pressure_means_no_commanded_alpha() {
        assert_eq!(LINEAR.alpha_for_lift(5_000.0, 0.0, 0.0585), 0.0);
    }

    #[test]
    fn load_limiter_caps_lift() {
        let q = 60_000.0;
        let area = 0.0585;
        let max_lift = 2.75 * 289.72 * 9.81;
        for model in [LINEAR, LEGACY] {
            let limited = model.limit_alpha_for_load(-0.4, q, area, max_lift);
            assert!(limited < 0.0 && limited > -0.4);
            let lift = model.forces(q, 0.8, limited, area).lift;
            assert!((lift.abs() - max_lift).abs() < 1e-6, "{:?}", model);
        }
        // Small demands pass through untouched
        assert_eq!(LINEAR.limit_alpha_for_load(0.01, q, area, max_lift), 0.01);
    }
}
