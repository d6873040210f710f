pub mod event;
pub mod history;
pub mod integrator;
pub mod runner;

pub use event::{EventKind, SimEvent};
pub use history::{FlightSample, History};
pub use integrator::{euler_step, rk4_step};
pub use runner::{simulate, simulate_airframe, simulate_with, Flight, Release, Termination, Trajectory};
