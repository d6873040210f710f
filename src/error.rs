use thiserror::Error;

/// Input validation failures for a single trajectory run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("release altitude is not finite: {0}")]
    NonFiniteAltitude(f64),

    #[error("release Mach number must be finite and non-negative, got {0}")]
    InvalidMach(f64),

    #[error("target range must be finite and positive, got {0}")]
    InvalidRange(f64),

    #[error("integration time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),

    #[error("simulation time ceiling must be finite and positive, got {0}")]
    InvalidMaxTime(f64),

    #[error("true airspeed must be finite and non-negative, got {0} km/h")]
    InvalidSpeed(f64),
}
