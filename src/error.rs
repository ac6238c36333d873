use std::io;
use thiserror::Error;

/// Everything that can go wrong while parsing, evaluating or integrating.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// The expression text is not a valid function of `x`.
    #[error("parse error: {message}")]
    Parse { message: String },
    /// The integrand is undefined at a sample point.
    #[error("cannot evaluate integrand at x = {x}: {reason}")]
    Evaluation { x: f64, reason: String },
    /// Bad segment count, interval, tolerance or table configuration.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The refinement loop hit its segment ceiling before meeting the tolerance.
    #[error(
        "refinement did not converge within {segments} segments \
         (last estimate {estimate}, error estimate {error})"
    )]
    NonConvergence {
        estimate: f64,
        error: f64,
        segments: usize,
    },
    /// Reading the problem file failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl IntegrationError {
    pub(crate) fn parse<S: Into<String>>(message: S) -> Self {
        IntegrationError::Parse {
            message: message.into(),
        }
    }

    pub(crate) fn evaluation<S: Into<String>>(x: f64, reason: S) -> Self {
        IntegrationError::Evaluation {
            x,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
        IntegrationError::InvalidArgument(message.into())
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match *self {
            IntegrationError::Parse { .. } => "ParseError",
            IntegrationError::Evaluation { .. } => "EvaluationError",
            IntegrationError::InvalidArgument(_) => "InvalidArgument",
            IntegrationError::NonConvergence { .. } => "NonConvergence",
            IntegrationError::Io(_) => "IoError",
        }
    }
}

pub type Result<T> = std::result::Result<T, IntegrationError>;
