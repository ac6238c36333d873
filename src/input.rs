//! Loading an integration problem from its five-line text form:
//!
//! ```text
//! sin(x)      integrand in x
//! 0           lower bound, any constant expression
//! pi          upper bound, any constant expression
//! 10          initial segment count
//! 1e-6        relative tolerance
//! ```

use crate::error::{IntegrationError, Result};
use crate::expression::Expression;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const FIELDS: [&str; 5] = [
    "integrand",
    "lower bound",
    "upper bound",
    "segment count",
    "tolerance",
];

/// One integration request.
#[derive(Clone, Debug, PartialEq)]
pub struct Problem {
    pub form: Expression,
    pub a: f64,
    pub b: f64,
    pub segments: usize,
    pub tolerance: f64,
}

impl Problem {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Problem> {
        let file = File::open(path)?;
        Problem::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Problem> {
        let mut lines = Vec::with_capacity(FIELDS.len());
        for line in BufReader::new(reader).lines().take(FIELDS.len()) {
            lines.push(line?);
        }

        let form = Expression::parse(field(&lines, 0)?)?;
        let a = Expression::parse_constant(field(&lines, 1)?)?;
        let b = Expression::parse_constant(field(&lines, 2)?)?;
        let segments = field(&lines, 3)?.parse::<usize>().map_err(|_| {
            IntegrationError::invalid(format!(
                "line 4: segment count must be a positive integer, got '{}'",
                lines[3].trim()
            ))
        })?;
        let tolerance = field(&lines, 4)?.parse::<f64>().map_err(|_| {
            IntegrationError::invalid(format!(
                "line 5: tolerance must be a number, got '{}'",
                lines[4].trim()
            ))
        })?;

        let problem = Problem {
            form,
            a,
            b,
            segments,
            tolerance,
        };
        problem.validate()?;
        Ok(problem)
    }

    fn validate(&self) -> Result<()> {
        if self.a >= self.b {
            return Err(IntegrationError::invalid(format!(
                "lines 2-3: lower bound {} must be below upper bound {}",
                self.a, self.b
            )));
        }
        if self.segments == 0 {
            return Err(IntegrationError::invalid(
                "line 4: segment count must be at least 1",
            ));
        }
        if !(self.tolerance > 0.0) || !self.tolerance.is_finite() {
            return Err(IntegrationError::invalid(format!(
                "line 5: tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

fn field(lines: &[String], i: usize) -> Result<&str> {
    match lines.get(i).map(|l| l.trim()) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(IntegrationError::invalid(format!(
            "line {}: missing {}",
            i + 1,
            FIELDS[i]
        ))),
    }
}
