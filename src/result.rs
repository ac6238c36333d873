use crate::error::IntegrationError;
use log::{info, warn};
use num::Float;

/// Structure for the result of an adaptive integration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegrationResult<T> {
    /// Value of the integration
    pub val: T,
    /// Estimated error of the integration (difference of the last two estimates)
    pub err: T,
    /// Number of segments of the finest grid used
    pub segments: usize,
    /// Number of refinement passes performed
    pub iterations: usize,
}

impl<T: Float> IntegrationResult<T> {
    pub(crate) fn new(val: T, err: T, segments: usize, iterations: usize) -> Self {
        IntegrationResult {
            val,
            err,
            segments,
            iterations,
        }
    }

    pub(crate) fn issue_info(&self) {
        info!(
            "converged to {:e} (error estimate {:e}) on {} segments after {} refinements",
            self.val.to_f64().unwrap_or(f64::NAN),
            self.err.to_f64().unwrap_or(f64::NAN),
            self.segments,
            self.iterations
        );
    }
}

/// Log a failed integration request before handing the error back.
pub(crate) fn issue_warning(error: &IntegrationError, args: Option<&[f64]>) {
    match error {
        IntegrationError::Parse { .. } => warn!("Could not parse integrand: {}", error),
        IntegrationError::Evaluation { x, reason } => {
            warn!("Bad integrand behavior at x = {}: {}", x, reason)
        }
        IntegrationError::InvalidArgument(msg) => {
            warn!("Invalid argument(s): {}. Args = {:?}", msg, args)
        }
        IntegrationError::NonConvergence { segments, .. } => warn!(
            "Number of refinements was insufficient, gave up at {} segments",
            segments
        ),
        IntegrationError::Io(_) => warn!("Could not read input: {}", error),
    }
}
