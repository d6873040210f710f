// ---------------------------------------------------------------------------
// Exponential-density atmosphere with a clamped linear temperature lapse
// ---------------------------------------------------------------------------

const R_AIR: f64 = 287.05; // specific gas constant for dry air, J/(kg·K)
const GAMMA: f64 = 1.4;    // ratio of specific heats

const RHO0: f64 = 1.225;          // sea-level density, kg/m^3
const SCALE_HEIGHT: f64 = 8500.0; // m
const T0: f64 = 288.15;           // sea-level temperature, K
const LAPSE: f64 = 0.0065;        // K/m
const T_TROPOPAUSE: f64 = 216.65; // K

/// Atmospheric properties at a given altitude.
#[derive(Debug, Clone, Copy)]
pub struct Atmo {
    pub density: f64,      // kg/m^3
    pub temperature: f64,  // K
    pub sound_speed: f64,  // m/s
}

/// Air density. Sea-level value below ground, exponential decay above.
pub fn air_density(altitude_m: f64) -> f64 {
    if altitude_m < 0.0 {
        return RHO0;
    }
    RHO0 * (-altitude_m / SCALE_HEIGHT).exp()
}

/// Temperature from the troposphere lapse rate, floored at the tropopause.
pub fn temperature(altitude_m: f64) -> f64 {
    (T0 - LAPSE * altitude_m).max(T_TROPOPAUSE)
}

/// Speed of sound from the ideal-gas relation a = sqrt(gamma * R * T).
pub fn sound_speed(altitude_m: f64) -> f64 {
    (GAMMA * R_AIR * temperature(altitude_m)).sqrt()
}

/// Full snapshot at one altitude.
pub fn at(altitude_m: f64) -> Atmo {
    Atmo {
        density: air_density(altitude_m),
        temperature: temperature(altitude_m),
        sound_speed: sound_speed(altitude_m),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
