pub use crate::adaptive::{adaptive_trapezoid, AdaptiveTrapezoid, AdaptiveTrapezoidBuilder};
pub use crate::error::{IntegrationError, Result};
pub use crate::expression::{evaluate, evaluate_range, Expression};
pub use crate::input::Problem;
pub use crate::integrand::Integrand;
pub use crate::plot::{Plot, PlotRequest, Plotter, TextPlotter};
pub use crate::report::{integral_line, triangular, TableKind};
pub use crate::result::IntegrationResult;
pub use crate::romberg::{build_romberg_table, RombergConfig, RombergConfigBuilder, RombergTable};
pub use crate::rules::{midpoint, trapezoid};
