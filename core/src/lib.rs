//! Mobility-trace generation core for the Rust UAV scenario platform.
//!
//! The engine takes a validated scenario (spatial envelope, discrete clock,
//! ordered UAV declarations) and produces a deterministic, timestep-ordered
//! XML trace for network simulators, plus a lazy per-tick frame stream for
//! side consumers such as renderers.

pub mod engine;
pub mod mobility;
pub mod prelude;
pub mod scenario;
pub mod telemetry;
pub mod trace;

pub use prelude::{BoundaryViolation, ConfigError, ConfigErrors, EngineError, EngineResult};
