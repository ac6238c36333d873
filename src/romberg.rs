//! Romberg table: Richardson extrapolation over a geometric sequence of
//! trapezoid grids.

use crate::error::{IntegrationError, Result};
use crate::integrand::Integrand;
use crate::result::issue_warning;
use crate::rules::trapezoid;
use crate::utils::{as_f64, check_interval, check_segments, count};
use log::{debug, info};
use ndarray::Array2;
use num::Float;
use std::convert::TryFrom;

/// Grid refinement and order parameters of a Romberg table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RombergConfig {
    /// Grid refinement factor `r` between successive levels, at least 2.
    pub ratio: usize,
    /// Number of grid levels `S`, at least 1.
    pub levels: usize,
    /// Order of accuracy `p` of the base rule, 2 for the trapezoid rule.
    pub order: u32,
    /// Order gained per extrapolation column `q`, 2 for the trapezoid rule.
    pub order_step: u32,
}

impl RombergConfig {
    /// Leading error order removed by column `l`: `p + l*q`.
    pub fn column_order(&self, l: usize) -> Result<i32> {
        u32::try_from(l)
            .ok()
            .and_then(|l| l.checked_mul(self.order_step))
            .and_then(|lq| lq.checked_add(self.order))
            .and_then(|order| i32::try_from(order).ok())
            .ok_or_else(|| {
                IntegrationError::invalid(format!(
                    "order {} + {}*{} of column {} overflows",
                    self.order, l, self.order_step, l
                ))
            })
    }

    /// Segment count of grid level `s`: `nseg0 * r^s`.
    pub fn segments(&self, nseg0: usize, s: usize) -> Result<usize> {
        let power = self
            .ratio
            .checked_pow(s as u32)
            .and_then(|rs| rs.checked_mul(nseg0));
        power.ok_or_else(|| {
            IntegrationError::invalid(format!(
                "grid level {} with {} initial segments overflows the segment count",
                s, nseg0
            ))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.ratio < 2 {
            return Err(IntegrationError::invalid(format!(
                "refinement ratio must be at least 2, got {}",
                self.ratio
            )));
        }
        if self.levels < 1 {
            return Err(IntegrationError::invalid("at least one grid level is required"));
        }
        if self.order == 0 || self.order_step == 0 {
            return Err(IntegrationError::invalid(format!(
                "orders must be positive, got p = {}, q = {}",
                self.order, self.order_step
            )));
        }
        // Orders grow with l, so the last column bounds them all
        let top = self.column_order(self.levels - 1)?;
        if (self.ratio as f64).powi(top).is_infinite() {
            return Err(IntegrationError::invalid(format!(
                "extrapolation factor {}^{} overflows",
                self.ratio, top
            )));
        }
        Ok(())
    }
}

impl Default for RombergConfig {
    fn default() -> Self {
        RombergConfig {
            ratio: 3,
            levels: 4,
            order: 2,
            order_step: 2,
        }
    }
}

/// Builder struct used to construct a validated Romberg configuration.
#[derive(Clone, Debug, Default)]
pub struct RombergConfigBuilder {
    ratio: Option<usize>,
    levels: Option<usize>,
    order: Option<u32>,
    order_step: Option<u32>,
}

impl RombergConfigBuilder {
    /// Set the grid refinement factor `r`.
    pub fn ratio(mut self, ratio: usize) -> Self {
        self.ratio = Some(ratio);
        self
    }
    /// Set the number of grid levels `S`.
    pub fn levels(mut self, levels: usize) -> Self {
        self.levels = Some(levels);
        self
    }
    /// Set the order of accuracy `p` of the base rule.
    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
    /// Set the order gained per extrapolation `q`.
    pub fn order_step(mut self, order_step: u32) -> Self {
        self.order_step = Some(order_step);
        self
    }
    /// Build the configuration, rejecting values outside their valid ranges.
    pub fn build(self) -> Result<RombergConfig> {
        let defaults = RombergConfig::default();
        let config = RombergConfig {
            ratio: self.ratio.unwrap_or(defaults.ratio),
            levels: self.levels.unwrap_or(defaults.levels),
            order: self.order.unwrap_or(defaults.order),
            order_step: self.order_step.unwrap_or(defaults.order_step),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Triangular table of extrapolated estimates `U` and error estimates `R`.
///
/// Only cells with `l <= s` of `U` and `l < s` of `R` are ever computed; the
/// accessors return `None` for everything else.
#[derive(Clone, Debug)]
pub struct RombergTable<T> {
    values: Array2<T>,
    errors: Array2<T>,
    segments: Vec<usize>,
    config: RombergConfig,
}

impl<T: Float> RombergTable<T> {
    /// Number of grid levels `S`.
    pub fn levels(&self) -> usize {
        self.segments.len()
    }

    /// Configuration the table was built with.
    pub fn config(&self) -> &RombergConfig {
        &self.config
    }

    /// Segment count of grid level `s`.
    pub fn segments(&self, s: usize) -> Option<usize> {
        self.segments.get(s).copied()
    }

    /// `U[s][l]`, defined for `l <= s`.
    pub fn value(&self, s: usize, l: usize) -> Option<T> {
        if s < self.levels() && l <= s {
            Some(self.values[[s, l]])
        } else {
            None
        }
    }

    /// `R[s][l]`, defined for `l < s`.
    pub fn error(&self, s: usize, l: usize) -> Option<T> {
        if s < self.levels() && l < s {
            Some(self.errors[[s, l]])
        } else {
            None
        }
    }

    /// Most refined estimate `U[S-1][S-1]`.
    pub fn best_estimate(&self) -> T {
        let last = self.levels() - 1;
        self.values[[last, last]]
    }

    /// Error estimate `R[S-1][S-2]` paired with the best estimate, absent for a
    /// single-level table.
    pub fn best_error(&self) -> Option<T> {
        let last = self.levels() - 1;
        if last == 0 {
            None
        } else {
            self.error(last, last - 1)
        }
    }

    /// Error order `p + l*q` of each column.
    pub fn orders(&self) -> Vec<i32> {
        (0..self.levels())
            .filter_map(|l| self.config.column_order(l).ok())
            .collect()
    }
}

/// Build the Romberg table of `f` over `[a, b]` with `nseg0` segments on the
/// coarsest grid.
///
/// `U[s][0]` is the trapezoid estimate on `nseg0 * r^s` segments, and for
/// `l < s`
///
/// `R[s][l] = (U[s][l] - U[s-1][l]) / (r^(p + l*q) - 1)`,
/// `U[s][l+1] = U[s][l] + R[s][l]`.
///
/// Any failure aborts the whole build.
pub fn build_romberg_table<T, F>(
    f: &F,
    a: T,
    b: T,
    nseg0: usize,
    config: &RombergConfig,
) -> Result<RombergTable<T>>
where
    T: Float,
    F: Integrand<T> + ?Sized,
{
    fill_table(f, a, b, nseg0, config).map_err(|err| {
        issue_warning(&err, Some(&[as_f64(a), as_f64(b), nseg0 as f64]));
        err
    })
}

fn fill_table<T, F>(
    f: &F,
    a: T,
    b: T,
    nseg0: usize,
    config: &RombergConfig,
) -> Result<RombergTable<T>>
where
    T: Float,
    F: Integrand<T> + ?Sized,
{
    config.validate()?;
    check_segments(nseg0)?;
    check_interval(a, b)?;

    let levels = config.levels;
    let segments = (0..levels)
        .map(|s| config.segments(nseg0, s))
        .collect::<Result<Vec<usize>>>()?;

    let mut values = Array2::from_elem((levels, levels), T::nan());
    let mut errors = Array2::from_elem((levels, levels), T::nan());

    for (s, &nseg) in segments.iter().enumerate() {
        values[[s, 0]] = trapezoid(f, a, b, nseg)?;
        debug!(
            "level {}: trapezoid on {} segments = {:e}",
            s,
            nseg,
            as_f64(values[[s, 0]])
        );
    }

    let ratio = count::<T>(config.ratio);
    for s in 1..levels {
        for l in 0..s {
            let factor = ratio.powi(config.column_order(l)?) - T::one();
            errors[[s, l]] = (values[[s, l]] - values[[s - 1, l]]) / factor;
            values[[s, l + 1]] = values[[s, l]] + errors[[s, l]];
        }
    }

    let table = RombergTable {
        values,
        errors,
        segments,
        config: *config,
    };
    info!(
        "romberg table with {} levels: best estimate {:e}",
        levels,
        as_f64(table.best_estimate())
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;
    use crate::test_utils::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn paper_config() -> RombergConfig {
        RombergConfigBuilder::default()
            .ratio(3)
            .levels(4)
            .order(2)
            .order_step(2)
            .build()
            .unwrap()
    }

    #[test]
    fn test_quadratic_scenario() {
        let form = Expression::parse("x**2").unwrap();
        let table = build_romberg_table(&form, 0.0, 1.0, 10, &paper_config()).unwrap();

        assert_eq!(table.levels(), 4);
        assert_eq!(table.segments(0), Some(10));
        assert_eq!(table.segments(3), Some(270));

        let u00 = table.value(0, 0).unwrap();
        test_rel(u00, 1.0 / 3.0 + 0.01 / 6.0, 1e-14);
        assert_abs_diff_eq!(u00, 0.3350, epsilon = 1e-4);

        assert_abs_diff_eq!(table.value(3, 3).unwrap(), 1.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(table.best_estimate(), 1.0 / 3.0, epsilon = 1e-9);
        // One extrapolation already removes the whole h^2 error of a quadratic
        assert_abs_diff_eq!(table.value(1, 1).unwrap(), 1.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(table.best_error().unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_correction_invariant() {
        let form = Expression::parse("exp(-x) * cos(3*x)").unwrap();
        let config = RombergConfigBuilder::default()
            .ratio(2)
            .levels(6)
            .build()
            .unwrap();
        let table = build_romberg_table(&form, 0.0, 2.0, 3, &config).unwrap();

        for s in 1..table.levels() {
            for l in 0..s {
                let u = table.value(s, l).unwrap();
                let r = table.error(s, l).unwrap();
                assert_eq!(table.value(s, l + 1).unwrap(), u + r);
            }
        }
    }

    #[test]
    fn test_error_factors() {
        let config = paper_config();
        let table = build_romberg_table(&|x: f64| x.exp(), 0.0, 1.0, 2, &config).unwrap();
        for s in 1..4 {
            for l in 0..s {
                let expected = (table.value(s, l).unwrap() - table.value(s - 1, l).unwrap())
                    / (3f64.powi(2 + 2 * l as i32) - 1.0);
                assert_eq!(table.error(s, l).unwrap(), expected);
            }
        }
        assert_eq!(table.orders(), vec![2, 4, 6, 8]);
    }

    #[test]
    fn test_extrapolation_converges() {
        let form = Expression::parse("sin(x)").unwrap();
        let config = RombergConfigBuilder::default()
            .ratio(2)
            .levels(5)
            .build()
            .unwrap();
        let table = build_romberg_table(&form, 0.0, PI, 2, &config).unwrap();
        let last = table.levels() - 1;
        let trapezoid_err = (table.value(last, 0).unwrap() - 2.0).abs();
        let romberg_err = (table.best_estimate() - 2.0).abs();
        assert!(romberg_err < trapezoid_err * 1e-4);
        assert_abs_diff_eq!(table.best_estimate(), 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_undefined_cells() {
        let table = build_romberg_table(&|x: f64| x, 0.0, 1.0, 1, &paper_config()).unwrap();
        assert!(table.value(0, 1).is_none());
        assert!(table.value(4, 0).is_none());
        assert!(table.error(0, 0).is_none());
        assert!(table.error(2, 2).is_none());
        assert!(table.error(2, 1).is_some());
    }

    #[test]
    fn test_single_level() {
        let config = RombergConfigBuilder::default().levels(1).build().unwrap();
        let table = build_romberg_table(&|x: f64| x, 0.0, 2.0, 4, &config).unwrap();
        assert_abs_diff_eq!(table.best_estimate(), 2.0, epsilon = 1e-14);
        assert!(table.best_error().is_none());
    }

    #[test]
    fn test_invalid_config() {
        assert!(RombergConfigBuilder::default().ratio(1).build().is_err());
        assert!(RombergConfigBuilder::default().levels(0).build().is_err());
        assert!(RombergConfigBuilder::default().order(0).build().is_err());
        assert!(RombergConfigBuilder::default().order_step(0).build().is_err());
        assert_eq!(
            RombergConfigBuilder::default().build().unwrap(),
            RombergConfig::default()
        );
    }

    #[test]
    fn test_order_overflow_rejected() {
        let res = RombergConfigBuilder::default()
            .levels(3)
            .order_step(u32::MAX)
            .build();
        assert!(matches!(res, Err(IntegrationError::InvalidArgument(_))));

        // Fits in u32 but not in the i32 exponent of powi
        let res = RombergConfigBuilder::default()
            .ratio(3)
            .levels(2)
            .order(3_000_000_000)
            .build();
        assert!(matches!(res, Err(IntegrationError::InvalidArgument(_))));

        // Representable exponent, but r^p is not
        let res = RombergConfigBuilder::default().order(2_000).build();
        assert!(matches!(res, Err(IntegrationError::InvalidArgument(_))));

        let config = RombergConfig::default();
        assert_eq!(config.column_order(3).unwrap(), 8);
        assert!(config.column_order(usize::MAX).is_err());
    }

    #[test]
    fn test_unvalidated_config_does_not_panic() {
        let config = RombergConfig {
            ratio: 3,
            levels: 3,
            order: 2,
            order_step: u32::MAX,
        };
        let res = build_romberg_table(&|x: f64| x * x, 0.0, 1.0, 10, &config);
        assert!(matches!(res, Err(IntegrationError::InvalidArgument(_))));
    }

    #[test]
    fn test_invalid_arguments() {
        let config = paper_config();
        let f = |x: f64| x;
        assert!(build_romberg_table(&f, 0.0, 1.0, 0, &config).is_err());
        assert!(build_romberg_table(&f, 1.0, 0.0, 10, &config).is_err());

        let huge = RombergConfigBuilder::default()
            .ratio(10)
            .levels(30)
            .build()
            .unwrap();
        match build_romberg_table(&f, 0.0, 1.0, 10, &huge) {
            Err(IntegrationError::InvalidArgument(_)) => {}
            other => panic!("expected invalid argument, got {:?}", other),
        }
    }

    #[test]
    fn test_all_or_nothing() {
        // Only the finer grids hit the singularity at x = 0.5
        let form = Expression::parse("1/(x - 0.5)").unwrap();
        let config = RombergConfigBuilder::default().ratio(2).build().unwrap();
        let res = build_romberg_table(&form, 0.0, 1.0, 1, &config);
        assert!(matches!(res, Err(IntegrationError::Evaluation { .. })));
    }
}
