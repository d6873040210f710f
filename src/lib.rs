//! Glide bomb trajectory simulation and time-to-impact tracking.
//!
//! A release (altitude, Mach, ground range) is classified into a flight
//! mode, flown through a phased guidance law with a point-mass integrator,
//! and tracked against the wall clock until impact.

pub mod dynamics;
pub mod error;
pub mod gnc;
pub mod io;
pub mod physics;
pub mod sim;
pub mod tracker;
pub mod vehicle;

pub use error::SimError;
pub use gnc::{classify, FlightMode, Phase};
pub use sim::{simulate, Release, Trajectory};
pub use tracker::{ActiveBomb, Prediction, Status, Tracker, TrackerConfig};
