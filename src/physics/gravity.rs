use nalgebra::Vector2;

use crate::dynamics::state::G0;

/// Uniform gravity (ground frame, x downrange, y up). No altitude variation.
pub fn gravity_accel() -> Vector2<f64> {
    Vector2::new(0.0, -G0)
}

/// Weight of a body of the given mass, N.
pub fn weight(mass: f64) -> f64 {
    mass * G0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_points_down() {
        let g = gravity_accel();
        assert_eq!(g.x, 0.0);
        assert!((g.y + 9.81).abs() < 1e-12);
    }
}
