//! Time sources for deriving the elapsed time between controller updates.
//!
//! Controllers never call `Instant::now()` directly. They read a [`Clock`],
//! which is [`SystemClock`] in production and [`ManualClock`] wherever timing
//! has to be deterministic.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::Real;

/// A monotonic-ish source of time in seconds.
///
/// Readings are only ever subtracted from one another, so the origin is
/// arbitrary. Implementations are not required to be monotonic.
pub trait Clock: Send + Sync {
    /// Current reading in seconds.
    fn now_seconds(&self) -> Real;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_seconds(&self) -> Real {
        (**self).now_seconds()
    }
}

/// Wall clock backed by [`Instant`], reporting seconds since creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_seconds(&self) -> Real {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to.
///
/// The reading is stored as `f64` bits in an atomic so a shared handle can be
/// advanced from a test while a controller holds another handle.
#[derive(Debug)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ManualClock {
    pub const fn new(start_seconds: Real) -> Self {
        Self {
            bits: AtomicU64::new(start_seconds.to_bits()),
        }
    }

    /// Jump to an absolute reading. Moving backwards is allowed.
    pub fn set(&self, seconds: Real) {
        self.bits.store(seconds.to_bits(), Ordering::Relaxed);
    }

    /// Move forward by `seconds` (or backward, if negative).
    pub fn advance(&self, seconds: Real) {
        let mut current = self.bits.load(Ordering::Relaxed);
        loop {
            let next = (Real::from_bits(current) + seconds).to_bits();
            match self.bits.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Clock for ManualClock {
    fn now_seconds(&self) -> Real {
        Real::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock::new();
        let a = clock.now_seconds();
        let b = clock.now_seconds();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    #[test]
    fn manual_clock_set_and_advance() {
        let clock = ManualClock::new(1.5);
        assert_eq!(clock.now_seconds(), 1.5);

        clock.advance(0.25);
        assert_eq!(clock.now_seconds(), 1.75);

        clock.set(0.5);
        assert_eq!(clock.now_seconds(), 0.5);

        clock.advance(-1.0);
        assert_eq!(clock.now_seconds(), -0.5);
    }

    #[test]
    fn shared_manual_clock_is_visible_through_arc() {
        let clock = Arc::new(ManualClock::default());
        let handle = Arc::clone(&clock);
        handle.advance(2.0);
        assert_eq!(clock.now_seconds(), 2.0);
    }
}
