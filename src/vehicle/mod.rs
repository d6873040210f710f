pub mod airframe;
pub mod profile;

pub use airframe::{presets, Airframe};
pub use profile::{profile_for, AeroProfile, PitchSchedule, Solver};
