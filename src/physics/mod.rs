pub mod atmosphere;
pub mod aerodynamics;
pub mod gravity;
