use crate::error::{IntegrationError, Result};
use crate::utils::as_f64;
use num::Float;

/// A real function of one variable that may be undefined at some points.
///
/// The quadrature rules only ever see this trait, so they work the same way
/// on parsed expressions and on plain closures.
pub trait Integrand<T: Float> {
    /// Value of the function at `x`.
    fn eval(&self, x: T) -> Result<T>;
}

/// Closures are always callable; a non-finite value means the function has
/// no value at `x`.
impl<T, F> Integrand<T> for F
where
    T: Float,
    F: Fn(T) -> T,
{
    fn eval(&self, x: T) -> Result<T> {
        let y = self(x);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(IntegrationError::evaluation(
                as_f64(x),
                format!("function returned {}", as_f64(y)),
            ))
        }
    }
}
