pub mod controller;
pub mod guidance;
pub mod mode;

pub use controller::{Controller, GuidanceCommand};
pub use guidance::{GlideGuidance, Phase, PhaseStep, StepContext};
pub use mode::{classify, Classification, FlightMode};
