//! Plot of the integrand around the integration interval with the area
//! under the chord from `(a, f(a))` to `(b, f(b))` shaded.

use crate::error::{IntegrationError, Result};
use crate::expression::Expression;
use ndarray::Array1;
use std::io::Write;

/// What to draw: `samples` points over `[a - delta, b + delta]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotRequest {
    pub a: f64,
    pub b: f64,
    pub delta: f64,
    pub samples: usize,
}

/// Sampled curve, shaded region and axis limits ready for a [`Plotter`].
#[derive(Clone, Debug)]
pub struct Plot {
    pub title: String,
    pub xs: Array1<f64>,
    pub ys: Vec<f64>,
    /// Corners `(a, f(a))` and `(b, f(b))` of the shaded region.
    pub shade: [(f64, f64); 2],
    pub x_limits: (f64, f64),
    pub y_limits: (f64, f64),
}

impl Plot {
    pub fn new(form: &Expression, request: &PlotRequest) -> Result<Plot> {
        let PlotRequest {
            a,
            b,
            delta,
            samples,
        } = *request;
        if samples < 2 {
            return Err(IntegrationError::invalid("a plot needs at least 2 samples"));
        }
        if !(delta >= 0.0) || !a.is_finite() || !b.is_finite() || a >= b {
            return Err(IntegrationError::invalid(format!(
                "cannot plot [{}, {}] with margin {}",
                a, b, delta
            )));
        }

        let x_limits = (a - delta, b + delta);
        let xs = Array1::linspace(x_limits.0, x_limits.1, samples);
        let ys = form.evaluate_range(xs.iter())?;
        let fa = form.evaluate(a)?;
        let fb = form.evaluate(b)?;

        let mut y_limits = (fa, fb + delta);
        if y_limits.0 >= y_limits.1 {
            // f(a) above f(b) + delta leaves nothing visible, use the data range
            let lo = ys.iter().cloned().fold(f64::INFINITY, f64::min).min(0.0);
            let hi = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max).max(0.0);
            y_limits = (lo - delta, hi + delta);
        }

        Ok(Plot {
            title: form.source().to_string(),
            xs,
            ys,
            shade: [(a, fa), (b, fb)],
            x_limits,
            y_limits,
        })
    }

    /// Height of the shaded chord at `x`, `None` outside `[a, b]`.
    pub fn chord(&self, x: f64) -> Option<f64> {
        let [(a, fa), (b, fb)] = self.shade;
        if x < a || x > b {
            None
        } else {
            Some(fa + (fb - fa) * (x - a) / (b - a))
        }
    }
}

/// Something that can display a [`Plot`].
pub trait Plotter {
    fn draw(&mut self, plot: &Plot) -> Result<()>;
}

/// Character chart: `*` for the curve, `:` for the shaded area, `-` for y = 0.
pub struct TextPlotter<W: Write> {
    out: W,
    height: usize,
}

impl<W: Write> TextPlotter<W> {
    pub fn new(out: W, height: usize) -> Self {
        TextPlotter {
            out,
            height: height.max(2),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn row_of(&self, y: f64, limits: (f64, f64)) -> Option<usize> {
        let (lo, hi) = limits;
        if !(y >= lo && y <= hi) {
            return None;
        }
        let top = (self.height - 1) as f64;
        Some(((hi - y) / (hi - lo) * top).round() as usize)
    }
}

impl<W: Write> Plotter for TextPlotter<W> {
    fn draw(&mut self, plot: &Plot) -> Result<()> {
        let width = plot.xs.len();
        let mut grid = vec![vec![' '; width]; self.height];

        if let Some(zero) = self.row_of(0.0, plot.y_limits) {
            for cell in grid[zero].iter_mut() {
                *cell = '-';
            }
        }

        for (col, (&x, &y)) in plot.xs.iter().zip(plot.ys.iter()).enumerate() {
            if let Some(top) = plot.chord(x) {
                let (lo, hi) = plot.y_limits;
                let from = self.row_of(top.max(lo).min(hi), plot.y_limits);
                let to = self.row_of(0.0f64.max(lo).min(hi), plot.y_limits);
                if let (Some(from), Some(to)) = (from, to) {
                    for row in grid.iter_mut().take(from.max(to) + 1).skip(from.min(to)) {
                        row[col] = ':';
                    }
                }
            }
            if let Some(row) = self.row_of(y, plot.y_limits) {
                grid[row][col] = '*';
            }
        }

        writeln!(self.out, "{}", plot.title)?;
        for row in grid {
            let line: String = row.into_iter().collect();
            writeln!(self.out, "|{}", line.trim_end())?;
        }
        writeln!(
            self.out,
            "x in [{:.4}, {:.4}], y in [{:.4}, {:.4}]",
            plot.x_limits.0, plot.x_limits.1, plot.y_limits.0, plot.y_limits.1
        )?;
        Ok(())
    }
}
