//! Composite quadrature rules over a uniform partition of `[a, b]`.

use crate::error::{IntegrationError, Result};
use crate::integrand::Integrand;
use crate::utils::{check_bounds, check_segments, constant, count};
use num::Float;

/// Compute the integral of `f` from `a` to `b` with the composite trapezoid
/// rule on `nseg` equal segments:
///
/// `dx * ((f(a) + f(b)) / 2 + sum_{i=1}^{nseg-1} f(a + i*dx))`, `dx = (b-a)/nseg`.
///
/// # Arguments
///
/// * `f` - Function to integrate
/// * `a` - Lower bound of integration.
/// * `b` - Upper bound of integration.
/// * `nseg` - Number of segments, at least 1.
pub fn trapezoid<T, F>(f: &F, a: T, b: T, nseg: usize) -> Result<T>
where
    T: Float,
    F: Integrand<T> + ?Sized,
{
    check_segments(nseg)?;
    check_bounds(a, b)?;

    let dx = (b - a) / count(nseg);
    let mut sum = constant::<T>(0.5) * (f.eval(a)? + f.eval(b)?);
    for i in 1..nseg {
        sum = sum + f.eval(a + count::<T>(i) * dx)?;
    }

    Ok(sum * dx)
}

/// Compute the integral of `f` from `a` to `b` with the composite midpoint
/// rule on `nseg` equal segments.
pub fn midpoint<T, F>(f: &F, a: T, b: T, nseg: usize) -> Result<T>
where
    T: Float,
    F: Integrand<T> + ?Sized,
{
    rectangle(f, a, b, nseg, constant(0.5))
}

/// Generalized rectangle rule: each segment is sampled at the fraction
/// `frac` of its width from the left edge (`0 <= frac <= 1`).
pub(crate) fn rectangle<T, F>(f: &F, a: T, b: T, nseg: usize, frac: T) -> Result<T>
where
    T: Float,
    F: Integrand<T> + ?Sized,
{
    check_segments(nseg)?;
    check_bounds(a, b)?;
    if !(frac >= T::zero() && frac <= T::one()) {
        return Err(IntegrationError::invalid(
            "sample fraction must lie in [0, 1]",
        ));
    }

    let dx = (b - a) / count(nseg);
    let start = a + frac * dx;
    let mut sum = T::zero();
    for i in 0..nseg {
        sum = sum + f.eval(start + count::<T>(i) * dx)?;
    }

    Ok(sum * dx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;
    use crate::test_utils::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_zero_width_interval() {
        let form = Expression::parse("sin(x)").unwrap();
        assert_eq!(trapezoid(&form, 1.3, 1.3, 1).unwrap(), 0.0);
        assert_eq!(midpoint(&form, 1.3, 1.3, 7).unwrap(), 0.0);
    }

    #[test]
    fn test_constant_is_exact() {
        let form = Expression::parse("2.5").unwrap();
        for &n in &[1, 2, 7, 64, 1000] {
            let val = trapezoid(&form, -1.0, 3.0, n).unwrap();
            assert_relative_eq!(val, 10.0, max_relative = 1e-12);
            let val = midpoint(&form, -1.0, 3.0, n).unwrap();
            assert_relative_eq!(val, 10.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_linear_is_exact() {
        let form = Expression::parse("x").unwrap();
        let (a, b) = (0.5, 4.0);
        let exact = (b * b - a * a) / 2.0;
        for &n in &[1, 3, 10, 333] {
            test_rel(trapezoid(&form, a, b, n).unwrap(), exact, 1e-12);
            test_rel(midpoint(&form, a, b, n).unwrap(), exact, 1e-12);
        }
    }

    #[test]
    fn test_refinement_reduces_error() {
        let form = Expression::parse("sin(x)").unwrap();
        let coarse = (trapezoid(&form, 0.0, PI, 50).unwrap() - 2.0).abs();
        let fine = (trapezoid(&form, 0.0, PI, 200).unwrap() - 2.0).abs();
        assert!(fine < coarse);
        // Second order: four times the segments, a sixteenth of the error
        assert_relative_eq!(coarse / fine, 16.0, max_relative = 1e-3);
    }

    #[test]
    fn test_trapezoid_closed_form() {
        // x^2 on [0, 1] with 10 segments: 1/3 + h^2/6
        let val = trapezoid(&|x: f64| x * x, 0.0, 1.0, 10).unwrap();
        test_rel(val, 1.0 / 3.0 + 0.01 / 6.0, 1e-14);
        assert_relative_eq!(val, 0.335, epsilon = 1e-12);
    }

    #[test]
    fn test_midpoint_combines_to_doubled_trapezoid() {
        let f = |x: f64| f3(x, 1.3);
        let t_n = trapezoid(&f, 0.3, 2.71, 16).unwrap();
        let m_n = midpoint(&f, 0.3, 2.71, 16).unwrap();
        let t_2n = trapezoid(&f, 0.3, 2.71, 32).unwrap();
        test_rel(0.5 * (t_n + m_n), t_2n, 1e-13);
    }

    #[test]
    fn test_rectangle_fractions() {
        let f = |x: f64| x;
        // Left and right rules on a linear integrand bracket the exact value
        let left = rectangle(&f, 0.0, 1.0, 4, 0.0).unwrap();
        let right = rectangle(&f, 0.0, 1.0, 4, 1.0).unwrap();
        assert_relative_eq!(left, 0.375);
        assert_relative_eq!(right, 0.625);
        assert!(rectangle(&f, 0.0, 1.0, 4, 1.5).is_err());
        assert!(rectangle(&f, 0.0, 1.0, 4, f64::NAN).is_err());
    }

    #[test]
    fn test_single_precision() {
        let val = trapezoid(&|x: f32| x * x, 0.0f32, 1.0f32, 100).unwrap();
        assert!((val - 1.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_segments_rejected() {
        let form = Expression::parse("x").unwrap();
        match trapezoid(&form, 0.0, 1.0, 0) {
            Err(IntegrationError::InvalidArgument(_)) => {}
            other => panic!("expected invalid argument, got {:?}", other),
        }
        assert!(midpoint(&form, 0.0, 1.0, 0).is_err());
        assert!(trapezoid(&form, 0.0, f64::INFINITY, 4).is_err());
    }

    #[test]
    fn test_evaluation_error_propagates() {
        let form = Expression::parse("1/x").unwrap();
        match trapezoid(&form, -1.0, 1.0, 2) {
            Err(IntegrationError::Evaluation { x, .. }) => assert_eq!(x, 0.0),
            other => panic!("expected evaluation error, got {:?}", other),
        }
        // Midpoints avoid the singularity
        assert!(midpoint(&form, -1.0, 1.0, 2).is_ok());
    }
}
