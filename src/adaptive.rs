//! Trapezoid rule refined by repeated segment doubling until a relative
//! tolerance is met.

use crate::error::{IntegrationError, Result};
use crate::integrand::Integrand;
use crate::result::{issue_warning, IntegrationResult};
use crate::rules::{midpoint, trapezoid};
use crate::utils::{as_f64, check_interval, check_segments, constant};
use log::debug;
use num::Float;

#[derive(Clone, Debug)]
/// Adaptive composite trapezoid integrator.
pub struct AdaptiveTrapezoid<T: Float> {
    /// Relative tolerance.
    pub reltol: T,
    /// Absolute tolerance, used when the integral is close to zero.
    pub abstol: T,
    /// Number of segments of the first grid.
    pub initial_segments: usize,
    /// Largest grid the refinement may reach before giving up.
    pub max_segments: usize,
}

impl<T: Float> AdaptiveTrapezoid<T> {
    /// Integrate a function `f` over the interval `a` to `b`.
    ///
    /// Starting from the trapezoid estimate on `initial_segments` segments,
    /// each pass averages the current estimate with the midpoint estimate on
    /// the same grid, which is the trapezoid estimate on the doubled grid.
    /// The loop stops once two successive estimates differ by no more than
    /// `max(|reltol * estimate|, abstol)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use trapz_romberg::adaptive::AdaptiveTrapezoidBuilder;
    ///
    /// let integrator = AdaptiveTrapezoidBuilder::default()
    ///     .reltol(1e-8)
    ///     .build();
    /// let res = integrator.integrate(&|x: f64| x * x, 0.0, 1.0).unwrap();
    /// assert!((res.val - 1.0 / 3.0).abs() < 1e-7);
    /// ```
    pub fn integrate<F>(&self, f: &F, a: T, b: T) -> Result<IntegrationResult<T>>
    where
        F: Integrand<T> + ?Sized,
    {
        self.refine(f, a, b).map_err(|err| {
            issue_warning(
                &err,
                Some(&[as_f64(a), as_f64(b), as_f64(self.reltol), as_f64(self.abstol)]),
            );
            err
        })
    }

    fn validate(&self, a: T, b: T) -> Result<()> {
        check_segments(self.initial_segments)?;
        check_interval(a, b)?;
        if !(self.reltol > T::zero()) || !self.reltol.is_finite() {
            return Err(IntegrationError::invalid(format!(
                "relative tolerance must be positive, got {}",
                as_f64(self.reltol)
            )));
        }
        if !(self.abstol >= T::zero()) || !self.abstol.is_finite() {
            return Err(IntegrationError::invalid(format!(
                "absolute tolerance must be non-negative, got {}",
                as_f64(self.abstol)
            )));
        }
        if self.max_segments < self.initial_segments {
            return Err(IntegrationError::invalid(format!(
                "segment ceiling {} is below the initial segment count {}",
                self.max_segments, self.initial_segments
            )));
        }
        Ok(())
    }

    fn refine<F>(&self, f: &F, a: T, b: T) -> Result<IntegrationResult<T>>
    where
        F: Integrand<T> + ?Sized,
    {
        self.validate(a, b)?;

        let half = constant::<T>(0.5);
        let mut nseg = self.initial_segments;
        let mut ans = trapezoid(f, a, b, nseg)?;
        // Seeded so that at least one refinement runs
        let mut err_est = T::one().max(ans.abs());
        let mut iterations = 0;

        while err_est > (self.reltol * ans).abs().max(self.abstol) {
            let doubled = match nseg.checked_mul(2) {
                Some(n) if n <= self.max_segments => n,
                _ => {
                    return Err(IntegrationError::NonConvergence {
                        estimate: as_f64(ans),
                        error: as_f64(err_est),
                        segments: nseg,
                    })
                }
            };

            let old_ans = ans;
            ans = half * (ans + midpoint(f, a, b, nseg)?);
            nseg = doubled;
            err_est = (ans - old_ans).abs();
            iterations += 1;

            debug!(
                "refinement {}: {} segments, estimate {:e}, error estimate {:e}",
                iterations,
                nseg,
                as_f64(ans),
                as_f64(err_est)
            );
        }

        let result = IntegrationResult::new(ans, err_est, nseg, iterations);
        result.issue_info();
        Ok(result)
    }
}

/// Builder struct used to construct an adaptive integrator with wanted parameters.
#[derive(Clone, Debug)]
pub struct AdaptiveTrapezoidBuilder<T: Float> {
    /// Relative tolerance.
    reltol: Option<T>,
    /// Absolute tolerance.
    abstol: Option<T>,
    /// Number of segments of the first grid.
    initial_segments: Option<usize>,
    /// Largest grid the refinement may reach.
    max_segments: Option<usize>,
}

impl<T: Float> Default for AdaptiveTrapezoidBuilder<T> {
    fn default() -> Self {
        AdaptiveTrapezoidBuilder {
            reltol: None,
            abstol: None,
            initial_segments: None,
            max_segments: None,
        }
    }
}

impl<T: Float> AdaptiveTrapezoidBuilder<T> {
    /// Set the relative tolerance.
    pub fn reltol(mut self, reltol: T) -> Self {
        self.reltol = Some(reltol);
        self
    }
    /// Set the absolute tolerance.
    pub fn abstol(mut self, abstol: T) -> Self {
        self.abstol = Some(abstol);
        self
    }
    /// Set the number of segments of the first grid.
    pub fn initial_segments(mut self, nseg: usize) -> Self {
        self.initial_segments = Some(nseg);
        self
    }
    /// Set the largest number of segments the refinement may use.
    pub fn max_segments(mut self, nseg: usize) -> Self {
        self.max_segments = Some(nseg);
        self
    }
    /// Build the integrator.
    pub fn build(self) -> AdaptiveTrapezoid<T> {
        AdaptiveTrapezoid {
            reltol: self.reltol.unwrap_or_else(|| constant(0.01)),
            abstol: self.abstol.unwrap_or_else(|| constant(1e-12)),
            initial_segments: self.initial_segments.unwrap_or(100),
            max_segments: self.max_segments.unwrap_or(1 << 22),
        }
    }
}

/// Integrate `f` over `[a, b]` starting from `nseg0` segments until the
/// relative change between refinements is at most `rtol`.
pub fn adaptive_trapezoid<T, F>(f: &F, a: T, b: T, rtol: T, nseg0: usize) -> Result<T>
where
    T: Float,
    F: Integrand<T> + ?Sized,
{
    let integrator = AdaptiveTrapezoidBuilder::default()
        .reltol(rtol)
        .initial_segments(nseg0)
        .build();
    integrator.integrate(f, a, b).map(|res| res.val)
}
