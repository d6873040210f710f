use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Airframe: mass properties and reference geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airframe {
    pub name: String,
    pub mass: f64,    // kg
    pub caliber: f64, // body diameter, m
}

impl Airframe {
    /// Reference area (body cross-section), m^2.
    pub fn reference_area(&self) -> f64 {
        PI * (self.caliber / 2.0).powi(2)
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// GBU-62 / JDAM-ER wing-kit glide bomb.
    pub fn gbu62() -> Airframe {
        Airframe {
            name: "GBU-62".into(),
            mass: 289.72,
            caliber: 0.273,
        }
    }
}
