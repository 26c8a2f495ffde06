use crate::{CoreError, CoreResult};

/// Floating point type used for gains, signals and time deltas.
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and `>= 0`.
pub fn ensure_non_negative(v: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(CoreError::InvalidArg { what });
    }
    Ok(v)
}

/// Clamp into `[min, max]` with the comparisons written out, so a NaN input
/// passes through unchanged instead of panicking on an inverted range.
pub fn clamp_to(v: Real, min: Real, max: Real) -> Real {
    if v > max {
        max
    } else if v < min {
        min
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "dead_band").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
        assert!(msg.contains("dead_band"));
    }

    #[test]
    fn ensure_non_negative_rejects_negative() {
        assert_eq!(ensure_non_negative(0.0, "x"), Ok(0.0));
        assert_eq!(
            ensure_non_negative(-0.5, "x"),
            Err(CoreError::InvalidArg { what: "x" })
        );
        assert!(matches!(
            ensure_non_negative(Real::INFINITY, "x"),
            Err(CoreError::NonFinite { .. })
        ));
    }

    #[test]
    fn clamp_to_handles_infinite_bounds() {
        assert_eq!(clamp_to(5.0, Real::NEG_INFINITY, Real::INFINITY), 5.0);
        assert_eq!(clamp_to(100.0, 2.0, 10.0), 10.0);
        assert_eq!(clamp_to(-3.0, 2.0, 10.0), 2.0);
        assert!(clamp_to(Real::NAN, 2.0, 10.0).is_nan());
    }
}
