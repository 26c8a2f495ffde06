//! PID core: gains, limits, history and the update step.
//!
//! [`PidCore`] is a plain value with no locking and no clock. It is a pure
//! function of its own state, the measured value and `dt`, which makes it the
//! piece to test and the piece to embed directly in single-threaded loops.
//! [`crate::Controller`] wraps it with a mutex and a wall clock.
//!
//! The step includes:
//! - Dead-band on the error
//! - Integral clamping (anti-windup)
//! - Derivative on measurement (no derivative kick on set point changes)
//! - Output clamping

use crate::error::{ControlError, ControlResult};
use pp_core::{Real, clamp_to};
use serde::{Deserialize, Serialize};

/// Default integral accumulator bounds.
pub const DEFAULT_INTEGRAL_LIMIT: Real = 100.0;

/// Proportional, integral and derivative gains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: Real,
    /// Integral gain.
    pub ki: Real,
    /// Derivative gain.
    pub kd: Real,
}

impl PidGains {
    pub fn new(kp: Real, ki: Real, kd: Real) -> Self {
        Self { kp, ki, kd }
    }
}

/// Closed clamp interval `[min, max]`.
///
/// Build with [`Limits::new`] to have the ordering checked. Infinite bounds
/// mean "no limit" on that side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub min: Real,
    pub max: Real,
}

impl Limits {
    /// Checked constructor. `what` names the limit pair in the error.
    pub fn new(min: Real, max: Real, what: &'static str) -> ControlResult<Self> {
        if min > max {
            return Err(ControlError::InvalidRange { what, min, max });
        }
        Ok(Self { min, max })
    }

    /// `(-inf, +inf)`.
    pub const fn unbounded() -> Self {
        Self {
            min: Real::NEG_INFINITY,
            max: Real::INFINITY,
        }
    }

    /// `[-100, 100]`, the accumulator bounds of a fresh controller.
    pub const fn default_integral() -> Self {
        Self {
            min: -DEFAULT_INTEGRAL_LIMIT,
            max: DEFAULT_INTEGRAL_LIMIT,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min == Real::NEG_INFINITY && self.max == Real::INFINITY
    }

    pub fn clamp(&self, v: Real) -> Real {
        clamp_to(v, self.min, self.max)
    }

    pub fn contains(&self, v: Real) -> bool {
        v >= self.min && v <= self.max
    }
}

/// History carried between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PidState {
    /// Integral accumulator, always within the integral limits.
    pub integral: Real,
    /// Measured value from the previous step.
    pub prev_value: Real,
    /// Error (after dead-band) from the previous step. Not used by the step.
    pub prev_error: Real,
}

/// Per-term breakdown of one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidTerms {
    /// Error after the dead-band was applied.
    pub error: Real,
    /// `kp * error`
    pub proportional: Real,
    /// `ki * integral`
    pub integral: Real,
    /// `kd * derivative`
    pub derivative: Real,
    /// Sum of the terms, clamped to the output limits.
    pub output: Real,
}

/// Single-threaded PID controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PidCore {
    gains: PidGains,
    set_point: Real,
    dead_band: Real,
    output_limits: Limits,
    integral_limits: Limits,
    state: PidState,
}

impl PidCore {
    /// Create a controller with unbounded output, integral limits of
    /// `[-100, 100]` and a set point of zero.
    pub fn new(gains: PidGains, dead_band: Real) -> Self {
        Self {
            gains,
            set_point: 0.0,
            dead_band,
            output_limits: Limits::unbounded(),
            integral_limits: Limits::default_integral(),
            state: PidState::default(),
        }
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    pub fn set_point(&self) -> Real {
        self.set_point
    }

    pub fn set_set_point(&mut self, value: Real) {
        self.set_point = value;
    }

    pub fn dead_band(&self) -> Real {
        self.dead_band
    }

    pub fn output_limits(&self) -> Limits {
        self.output_limits
    }

    /// Replace the output limits. Already returned outputs are not revisited.
    ///
    /// # Errors
    ///
    /// [`ControlError::InvalidRange`] if `min > max`; the limits are unchanged.
    pub fn set_output_limits(&mut self, min: Real, max: Real) -> ControlResult<()> {
        self.output_limits = Limits::new(min, max, "output limits")?;
        Ok(())
    }

    pub fn integral_limits(&self) -> Limits {
        self.integral_limits
    }

    /// Replace the integral limits and pull the accumulator into the new range.
    ///
    /// # Errors
    ///
    /// [`ControlError::InvalidRange`] if `min > max`; the limits and the
    /// accumulator are unchanged.
    pub fn set_integral_limits(&mut self, min: Real, max: Real) -> ControlResult<()> {
        self.integral_limits = Limits::new(min, max, "integral limits")?;
        self.state.integral = self.integral_limits.clamp(self.state.integral);
        Ok(())
    }

    pub fn state(&self) -> PidState {
        self.state
    }

    /// Forget accumulated history. Gains, limits and set point are kept.
    pub fn reset(&mut self) {
        self.state = PidState::default();
    }

    /// Advance the controller by `dt` seconds with a new measurement.
    ///
    /// A non-positive `dt` still accumulates `error * dt` into the integral
    /// but zeroes the derivative. Non-finite inputs are not rejected.
    pub fn step(&mut self, measured: Real, dt: Real) -> PidTerms {
        let mut error = self.set_point - measured;
        if error.abs() < self.dead_band {
            error = 0.0;
        }

        self.state.integral = self
            .integral_limits
            .clamp(self.state.integral + error * dt);

        // Derivative on measurement: the set point does not appear here.
        let derivative = if dt > 0.0 {
            -(measured - self.state.prev_value) / dt
        } else {
            0.0
        };
        self.state.prev_value = measured;

        let proportional = self.gains.kp * error;
        let integral = self.gains.ki * self.state.integral;
        let derivative = self.gains.kd * derivative;
        let output = self
            .output_limits
            .clamp(proportional + integral + derivative);

        self.state.prev_error = error;

        PidTerms {
            error,
            proportional,
            integral,
            derivative,
            output,
        }
    }
}
