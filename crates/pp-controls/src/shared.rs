//! Thread-safe controller.
//!
//! [`Controller`] puts a [`PidCore`] and the time of the last wall-clock
//! update behind one mutex. Every operation takes the lock for its whole
//! duration, so updates always see a consistent set of gains, limits and set
//! point.

use parking_lot::{Mutex, MutexGuard};
use pp_core::{Clock, Real, SystemClock};
use tracing::{debug, trace, warn};

use crate::config::PidConfig;
use crate::controller::{Limits, PidCore, PidGains, PidState};
use crate::error::ControlResult;

#[derive(Debug)]
struct Inner {
    core: PidCore,
    last_update: Real,
}

/// PID controller that can be shared between threads.
///
/// # Example
///
/// ```
/// use pp_controls::Controller;
///
/// let pid = Controller::new(1.0, 0.0, 0.0, 0.0);
/// pid.set_output_limits(2.0, 10.0).unwrap();
/// pid.set_set_point(100.0);
///
/// assert_eq!(pid.update_with_duration(0.0, 0.1), 10.0);
/// ```
#[derive(Debug)]
pub struct Controller<C = SystemClock> {
    inner: Mutex<Inner>,
    clock: C,
}

impl Controller<SystemClock> {
    /// Create a controller timed by the system clock.
    ///
    /// Output is unbounded, the integral is limited to `[-100, 100]` and the
    /// set point starts at zero.
    pub fn new(kp: Real, ki: Real, kd: Real, dead_band: Real) -> Self {
        Self::with_clock(kp, ki, kd, dead_band, SystemClock::new())
    }

    /// Build a controller from a validated configuration.
    pub fn from_config(config: &PidConfig) -> ControlResult<Self> {
        Self::from_config_with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> Controller<C> {
    /// Create a controller that reads elapsed time from `clock`.
    pub fn with_clock(kp: Real, ki: Real, kd: Real, dead_band: Real, clock: C) -> Self {
        let core = PidCore::new(PidGains::new(kp, ki, kd), dead_band);
        let last_update = clock.now_seconds();
        Self {
            inner: Mutex::new(Inner { core, last_update }),
            clock,
        }
    }

    pub fn from_config_with_clock(config: &PidConfig, clock: C) -> ControlResult<Self> {
        config.validate()?;
        let PidGains { kp, ki, kd } = config.gains;
        let pid = Self::with_clock(kp, ki, kd, config.dead_band, clock);
        {
            let mut inner = pid.lock();
            inner.core.set_set_point(config.set_point);
            if let Some(limits) = config.output_limits {
                inner.core.set_output_limits(limits.min, limits.max)?;
            }
            let limits = config.integral_limits;
            inner.core.set_integral_limits(limits.min, limits.max)?;
        }
        Ok(pid)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock()
    }

    /// Replace the output limits.
    ///
    /// # Errors
    ///
    /// [`crate::ControlError::InvalidRange`] if `min > max`; nothing changes.
    pub fn set_output_limits(&self, min: Real, max: Real) -> ControlResult<()> {
        self.lock().core.set_output_limits(min, max)?;
        debug!(min, max, "output limits set");
        Ok(())
    }

    pub fn output_limits(&self) -> Limits {
        self.lock().core.output_limits()
    }

    /// Replace the integral limits and re-clamp the accumulator.
    ///
    /// # Errors
    ///
    /// [`crate::ControlError::InvalidRange`] if `min > max`; nothing changes.
    pub fn set_integral_limits(&self, min: Real, max: Real) -> ControlResult<()> {
        let mut inner = self.lock();
        inner.core.set_integral_limits(min, max)?;
        debug!(min, max, integral = inner.core.state().integral, "integral limits set");
        Ok(())
    }

    pub fn integral_limits(&self) -> Limits {
        self.lock().core.integral_limits()
    }

    pub fn set_set_point(&self, value: Real) {
        self.lock().core.set_set_point(value);
    }

    pub fn set_point(&self) -> Real {
        self.lock().core.set_point()
    }

    /// Replace all three gains at once.
    pub fn set_pid(&self, kp: Real, ki: Real, kd: Real) {
        self.lock().core.set_gains(PidGains::new(kp, ki, kd));
        debug!(kp, ki, kd, "gains set");
    }

    /// Current `(kp, ki, kd)`.
    pub fn pid(&self) -> (Real, Real, Real) {
        let PidGains { kp, ki, kd } = self.lock().core.gains();
        (kp, ki, kd)
    }

    pub fn dead_band(&self) -> Real {
        self.lock().core.dead_band()
    }

    /// Snapshot of the integral accumulator and the previous step.
    pub fn state(&self) -> PidState {
        self.lock().core.state()
    }

    /// Clear history and restart the elapsed-time measurement.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.core.reset();
        inner.last_update = self.clock.now_seconds();
    }

    /// Current settings as a configuration document.
    pub fn config(&self) -> PidConfig {
        let inner = self.lock();
        let output_limits = inner.core.output_limits();
        PidConfig {
            gains: inner.core.gains(),
            dead_band: inner.core.dead_band(),
            set_point: inner.core.set_point(),
            output_limits: (!output_limits.is_unbounded()).then_some(output_limits),
            integral_limits: inner.core.integral_limits(),
        }
    }

    /// Run one step, using the time since the previous `update` (or since
    /// construction) as `dt`.
    ///
    /// `dt` is not validated: it is zero when the clock has not moved and
    /// negative if the clock went backwards.
    pub fn update(&self, measured: Real) -> Real {
        let mut inner = self.lock();
        let now = self.clock.now_seconds();
        let dt = now - inner.last_update;
        inner.last_update = now;
        Self::step(&mut inner.core, measured, dt)
    }

    /// Run one step with a caller-supplied `dt` in seconds.
    ///
    /// The wall-clock reference used by [`Controller::update`] is left alone.
    pub fn update_with_duration(&self, measured: Real, dt: Real) -> Real {
        Self::step(&mut self.lock().core, measured, dt)
    }

    fn step(core: &mut PidCore, measured: Real, dt: Real) -> Real {
        let terms = core.step(measured, dt);
        trace!(
            measured,
            dt,
            error = terms.error,
            p = terms.proportional,
            i = terms.integral,
            d = terms.derivative,
            output = terms.output,
            "pid step"
        );
        if !terms.output.is_finite() {
            warn!(measured, dt, output = terms.output, "non-finite controller output");
        }
        terms.output
    }
}
