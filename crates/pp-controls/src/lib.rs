//! PID feedback control for pidpool.
//!
//! Given a set point and a stream of measurements, a controller produces a
//! corrective output for the caller to apply to its actuator. The crate is a
//! leaf primitive: it performs no I/O and owns no threads.
//!
//! # Architecture
//!
//! - [`PidCore`] holds gains, limits and history and runs the update step as a
//!   pure function of `(state, measured, dt)`
//! - [`Controller`] wraps a core in a single mutex and derives `dt` from an
//!   injectable [`pp_core::Clock`]
//! - [`PidConfig`] is the serde form of a controller's settings
//!
//! # Behaviour
//!
//! - **Dead-band**: errors smaller than the band are treated as zero
//! - **Anti-windup**: the integral accumulator is clamped after every step and
//!   whenever its limits change
//! - **Derivative on measurement**: set point steps do not kick the output
//! - **Output clamping**: every returned value lies within the output limits

pub mod config;
pub mod controller;
pub mod error;
pub mod shared;

pub use config::PidConfig;
pub use controller::{DEFAULT_INTEGRAL_LIMIT, Limits, PidCore, PidGains, PidState, PidTerms};
pub use error::{ControlError, ControlResult};
pub use shared::Controller;
