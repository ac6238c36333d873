//! Definite integrals of a function of one variable by the composite
//! trapezoid rule, refined adaptively or extrapolated with a Romberg table.

pub mod adaptive;
pub(crate) mod builtins;
pub mod error;
pub mod expression;
pub mod input;
pub mod integrand;
pub mod plot;
pub mod prelude;
pub mod report;
pub mod result;
pub mod romberg;
pub mod rules;
#[cfg(test)]
pub(crate) mod test_utils;
pub(crate) mod utils;
