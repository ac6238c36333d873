use crate::error::{IntegrationError, Result};
use num::Float;

/// Convert an `f64` constant into the working float type.
#[inline]
pub(crate) fn constant<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// Convert a segment count into the working float type.
#[inline]
pub(crate) fn count<T: Float>(n: usize) -> T {
    T::from(n).unwrap_or_else(T::nan)
}

/// Lossy view of a working float for error payloads and log lines.
#[inline]
pub(crate) fn as_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

pub(crate) fn check_segments(nseg: usize) -> Result<()> {
    if nseg == 0 {
        return Err(IntegrationError::invalid(
            "segment count must be at least 1",
        ));
    }
    Ok(())
}

pub(crate) fn check_bounds<T: Float>(a: T, b: T) -> Result<()> {
    if !a.is_finite() || !b.is_finite() {
        return Err(IntegrationError::invalid(format!(
            "integration bounds must be finite, got [{}, {}]",
            as_f64(a),
            as_f64(b)
        )));
    }
    Ok(())
}

/// Bounds must be finite and strictly increasing.
pub(crate) fn check_interval<T: Float>(a: T, b: T) -> Result<()> {
    check_bounds(a, b)?;
    if a >= b {
        return Err(IntegrationError::invalid(format!(
            "lower bound must be below upper bound, got a = {}, b = {}",
            as_f64(a),
            as_f64(b)
        )));
    }
    Ok(())
}
