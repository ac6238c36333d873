//! Named functions and constants available inside expressions.

use evalexpr::Value;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Where a built-in function is defined on the real line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Domain {
    Real,
    /// `x > 0`
    Positive,
    /// `x >= 0`
    NonNegative,
    /// `-1 <= x <= 1`
    UnitInterval,
}

impl Domain {
    pub(crate) fn contains(self, x: f64) -> bool {
        match self {
            Domain::Real => true,
            Domain::Positive => x > 0.0,
            Domain::NonNegative => x >= 0.0,
            Domain::UnitInterval => (-1.0..=1.0).contains(&x),
        }
    }
}

/// A one-argument real function.
#[derive(Clone, Copy)]
pub(crate) struct Builtin {
    pub name: &'static str,
    pub apply: fn(f64) -> f64,
    pub domain: Domain,
}

impl Builtin {
    /// Apply the function, refusing arguments outside its domain and
    /// non-finite results.
    pub(crate) fn call(&self, arg: f64) -> Result<f64, String> {
        if !self.domain.contains(arg) {
            return Err(format!("{}({}) is outside the domain", self.name, arg));
        }
        let value = (self.apply)(arg);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("{}({}) is not finite", self.name, arg))
        }
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

fn builtin(name: &'static str, apply: fn(f64) -> f64, domain: Domain) -> (&'static str, Builtin) {
    (
        name,
        Builtin {
            name,
            apply,
            domain,
        },
    )
}

lazy_static! {
    static ref FUNCTIONS: HashMap<&'static str, Builtin> = {
        let table = vec![
            builtin("sin", f64::sin, Domain::Real),
            builtin("cos", f64::cos, Domain::Real),
            builtin("tan", f64::tan, Domain::Real),
            builtin("asin", f64::asin, Domain::UnitInterval),
            builtin("acos", f64::acos, Domain::UnitInterval),
            builtin("atan", f64::atan, Domain::Real),
            builtin("sinh", f64::sinh, Domain::Real),
            builtin("cosh", f64::cosh, Domain::Real),
            builtin("tanh", f64::tanh, Domain::Real),
            builtin("exp", f64::exp, Domain::Real),
            builtin("log", f64::ln, Domain::Positive),
            builtin("ln", f64::ln, Domain::Positive),
            builtin("log10", f64::log10, Domain::Positive),
            builtin("log2", f64::log2, Domain::Positive),
            builtin("sqrt", f64::sqrt, Domain::NonNegative),
            builtin("abs", f64::abs, Domain::Real),
        ];
        table.into_iter().collect()
    };
    static ref CONSTANTS: HashMap<&'static str, Value> = {
        let mut m = HashMap::new();
        m.insert("pi", Value::Float(std::f64::consts::PI));
        m.insert("e", Value::Float(std::f64::consts::E));
        m.insert("E", Value::Float(std::f64::consts::E));
        m
    };
}

pub(crate) fn function(name: &str) -> Option<Builtin> {
    FUNCTIONS.get(name).copied()
}

pub(crate) fn constant(name: &str) -> Option<&'static Value> {
    CONSTANTS.get(name)
}
