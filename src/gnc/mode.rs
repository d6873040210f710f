use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Flight-mode classification of the release geometry
// ---------------------------------------------------------------------------

/// LOS depression (deg) steeper than this selects a steep dive.
pub const STEEP_DIVE_LOS_DEG: f64 = -19.04;
/// Range/altitude above this selects a max-range glide.
pub const MAX_RANGE_GLIDE_RATIO: f64 = 13.23;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightMode {
    Standard,
    MaxRange,
    SteepDive,
}

impl FlightMode {
    /// Steep dives go straight from ballistic fall to glide.
    pub fn skips_loft(self) -> bool {
        matches!(self, FlightMode::SteepDive)
    }

    /// One-letter code for compact displays.
    pub fn shorthand(self) -> char {
        match self {
            FlightMode::Standard => 'D',
            FlightMode::MaxRange => 'M',
            FlightMode::SteepDive => 'S',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlightMode::Standard => "STANDARD",
            FlightMode::MaxRange => "MAX_RANGE",
            FlightMode::SteepDive => "STEEP_DIVE",
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classifier output together with the geometry it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub mode: FlightMode,
    pub los_deg: f64,
    pub glide_ratio: f64,
}

/// Line-of-sight angle from the release point to the target, deg (negative = below).
pub fn line_of_sight_deg(altitude: f64, range: f64) -> f64 {
    (-altitude).atan2(range).to_degrees()
}

/// Range over altitude. Infinite at or below ground level.
pub fn glide_ratio(altitude: f64, range: f64) -> f64 {
    if altitude > 0.0 {
        range / altitude
    } else {
        f64::INFINITY
    }
}

/// Classify a release. First match wins: steep dive, max range, standard.
///
/// Mach is part of the release geometry but this taxonomy does not branch on it.
pub fn classify(altitude: f64, _mach: f64, range: f64) -> Classification {
    let los_deg = line_of_sight_deg(altitude, range);
    let glide_ratio = glide_ratio(altitude, range);

    let mode = if los_deg < STEEP_DIVE_LOS_DEG {
        FlightMode::SteepDive
    } else if glide_ratio > MAX_RANGE_GLIDE_RATIO {
        FlightMode::MaxRange
    } else {
        FlightMode::Standard
    };

    Classification { mode, los_deg, glide_ratio }
}
